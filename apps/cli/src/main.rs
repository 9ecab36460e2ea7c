//! EcoDelicias CLI - recipes, ecological blog and admin reports.

mod commands;
mod output;

use clap::{Args, Parser, Subcommand};
use eco_config_and_utils::{init_logging, Config, Paths};
use tracing::debug;

/// EcoDelicias CLI - browse and manage recipes and ecological blog posts.
#[derive(Parser)]
#[command(name = "ecodelicias")]
#[command(about = "EcoDelicias CLI for recipes, blog posts and reports")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format (text or json)
    #[arg(short, long, default_value = "text", global = true)]
    format: output::OutputFormat,

    /// Log level (trace, debug, info, warn, error); defaults to the config value
    #[arg(long, global = true)]
    log_level: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Login with email and password
    Login {
        /// Account email (prompted when omitted)
        #[arg(short, long)]
        email: Option<String>,
    },

    /// Logout and clear the stored session
    Logout,

    /// Show who is logged in
    Status,

    /// Create an account
    Register(commands::RegisterArgs),

    /// Browse and manage recipes
    Recipes {
        #[command(subcommand)]
        command: RecipeCommands,
    },

    /// Browse and manage ecological blog posts
    Blogs {
        #[command(subcommand)]
        command: BlogCommands,
    },

    /// Show the admin dashboard
    Reports,
}

#[derive(Subcommand)]
enum RecipeCommands {
    /// List recipes
    List(RecipeListArgs),
    /// Add a recipe
    Add(commands::RecipeFields),
    /// Edit a recipe
    Edit {
        /// Recipe ID
        id: i64,
        #[command(flatten)]
        fields: commands::RecipeFields,
    },
    /// Delete a recipe
    Delete {
        /// Recipe ID
        id: i64,
    },
}

#[derive(Args)]
struct RecipeListArgs {
    /// Case-insensitive title search
    #[arg(short, long, default_value = "")]
    search: String,
    /// Only recipes in this category ID
    #[arg(long)]
    category: Option<i64>,
    /// Only recipes with this difficulty ID
    #[arg(long)]
    difficulty: Option<i64>,
}

#[derive(Subcommand)]
enum BlogCommands {
    /// List blog posts
    List {
        /// Case-insensitive title search
        #[arg(short, long, default_value = "")]
        search: String,
    },
    /// Add a blog post
    Add(commands::BlogFields),
    /// Edit a blog post
    Edit {
        /// Blog post ID
        id: i64,
        #[command(flatten)]
        fields: commands::BlogFields,
    },
    /// Delete a blog post
    Delete {
        /// Blog post ID
        id: i64,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let paths = match Paths::new() {
        Ok(paths) => paths,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };
    let config = match Config::load(&paths) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Warning: ignoring unreadable config: {}", e);
            Config::new()
        }
    };

    let level = cli
        .log_level
        .clone()
        .unwrap_or_else(|| config.log_level.clone());
    init_logging("cli", &level);
    debug!(api = %config.api_base_url, "Starting");

    let format = cli.format;
    let result = match commands::Context::open(paths, config) {
        Ok(ctx) => run(&ctx, cli.command, &format).await,
        Err(e) => Err(e),
    };

    if let Err(e) = result {
        output::print_error(&e.to_string(), &format);
        std::process::exit(1);
    }
}

async fn run(
    ctx: &commands::Context,
    command: Commands,
    format: &output::OutputFormat,
) -> anyhow::Result<()> {
    match command {
        Commands::Login { email } => commands::login(ctx, email, format).await,
        Commands::Logout => commands::logout(ctx, format),
        Commands::Status => commands::status(ctx, format),
        Commands::Register(args) => commands::register(ctx, args, format).await,
        Commands::Recipes { command } => match command {
            RecipeCommands::List(args) => {
                let filter = eco_resource_cache::RecipeFilter {
                    search: args.search,
                    category_id: args.category,
                    difficulty_id: args.difficulty,
                };
                commands::recipes_list(ctx, filter, format).await
            }
            RecipeCommands::Add(fields) => commands::recipes_add(ctx, fields, format).await,
            RecipeCommands::Edit { id, fields } => {
                commands::recipes_edit(ctx, id, fields, format).await
            }
            RecipeCommands::Delete { id } => commands::recipes_delete(ctx, id, format).await,
        },
        Commands::Blogs { command } => match command {
            BlogCommands::List { search } => {
                commands::blogs_list(ctx, eco_resource_cache::BlogFilter { search }, format).await
            }
            BlogCommands::Add(fields) => commands::blogs_add(ctx, fields, format).await,
            BlogCommands::Edit { id, fields } => {
                commands::blogs_edit(ctx, id, fields, format).await
            }
            BlogCommands::Delete { id } => commands::blogs_delete(ctx, id, format).await,
        },
        Commands::Reports => commands::reports(ctx, format).await,
    }
}
