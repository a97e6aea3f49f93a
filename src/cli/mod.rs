//! Kiosk CLI
//!
//! Thin plumbing around [`kiosk::app::App`]: each subcommand maps to the
//! typed command a UI section would dispatch.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use kiosk::{
    app::App,
    catalog::FileFeed,
    storage::{FileStore, Storage},
};

mod account;
mod cart;
mod orders;
mod products;

#[derive(Debug, Args)]
struct StoreArgs {
    /// Directory holding the persistent store
    #[arg(long, env = "KIOSK_STATE_DIR", default_value = ".kiosk", global = true)]
    state_dir: PathBuf,

    /// Path to the product catalog feed
    #[arg(long, env = "KIOSK_DATA", default_value = "data.json", global = true)]
    data: PathBuf,
}

impl StoreArgs {
    fn app(&self) -> Result<App, String> {
        let store = FileStore::open(self.state_dir.join("store.json"))
            .map_err(|error| format!("failed to open store: {error}"))?;
        let feed = FileFeed::new(&self.data);

        Ok(App::new(Storage::new(Box::new(store)), Box::new(feed)))
    }
}

#[derive(Debug, Parser)]
#[command(name = "kiosk", about = "Kiosk storefront CLI", long_about = None)]
pub(crate) struct Cli {
    #[command(flatten)]
    store: StoreArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List products, with optional category and search filters
    Products(products::ProductsArgs),

    /// Inspect or edit the cart
    Cart(cart::CartCommand),

    /// Validate checkout details and place an order
    Checkout(cart::CheckoutArgs),

    /// Create an account and sign in
    Signup(account::SignupArgs),

    /// Sign in with an email or number
    Login(account::LoginArgs),

    /// Sign out
    Logout,

    /// Show the order history
    Orders,

    /// Show the signed-in profile
    Profile,
}

impl Cli {
    pub(crate) fn run(self) -> Result<(), String> {
        let mut app = self.store.app()?;

        match self.command {
            Commands::Products(args) => products::run(&mut app, args),
            Commands::Cart(command) => cart::run(&mut app, command),
            Commands::Checkout(args) => cart::checkout(&mut app, args),
            Commands::Signup(args) => account::signup(&mut app, args),
            Commands::Login(args) => account::login(&mut app, args),
            Commands::Logout => account::logout(&mut app),
            Commands::Orders => orders::run(&mut app),
            Commands::Profile => account::profile(&app),
        }
    }
}
