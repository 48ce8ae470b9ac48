use clap::{Parser, Subcommand};
use user_service::api::users::UserView;
use user_service::config::DatabaseSettings;
use user_service::database::{self, UserStore};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None, verbatim_doc_comment)]
/// Command line administration for the user service database.
/// Reads DATABASE_URL (and the DATABASE_* pool settings) like the server.
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Manage the `users` table itself.
    Schema {
        #[command(subcommand)]
        schema_command: SchemaCommand,
    },
    /// Inspect or remove user rows.
    Users {
        #[command(subcommand)]
        users_command: UsersCommand,
    },
}

#[derive(Subcommand, Debug)]
enum SchemaCommand {
    /// Creates the `users` table if it does not exist yet.
    Init,
    /// Drops the `users` table and every row in it. Use with care!
    Drop,
}

#[derive(Subcommand, Debug)]
enum UsersCommand {
    /// Prints every user's public fields as JSON.
    List,
    /// Prints one user's public fields as JSON.
    Show {
        #[arg(long)]
        id: i32,
    },
    /// Deletes one user by id.
    Delete {
        #[arg(long)]
        id: i32,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let db = database::connect_with_settings(&DatabaseSettings::from_env()).await?;

    match cli.command {
        Commands::Schema { schema_command } => match schema_command {
            SchemaCommand::Init => {
                database::ensure_schema(&db).await?;
                println!("Schema is ready.");
            }
            SchemaCommand::Drop => {
                database::drop_schema(&db).await?;
                println!("Dropped table `users`.");
            }
        },
        Commands::Users { users_command } => {
            let store = UserStore::new(db);
            match users_command {
                UsersCommand::List => {
                    let users: Vec<UserView> =
                        store.list().await?.iter().map(UserView::from).collect();
                    println!("{}", serde_json::to_string_pretty(&users)?);
                    eprintln!("{} user(s)", store.count().await?);
                }
                UsersCommand::Show { id } => match store.find(id).await? {
                    Some(user) => {
                        println!("{}", serde_json::to_string_pretty(&UserView::from(&user))?)
                    }
                    None => println!("User with id = {} not found.", id),
                },
                UsersCommand::Delete { id } => match store.delete(id).await {
                    Ok(()) => println!("Deleted user {}.", id),
                    Err(user_service::errors::AppError::NotFound(_)) => {
                        println!("User with id = {} not found.", id)
                    }
                    Err(e) => return Err(e.into()),
                },
            }
        }
    }

    Ok(())
}
