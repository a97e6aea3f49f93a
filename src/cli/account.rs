//! Account commands: signup, login, logout and profile.

use clap::Args;
use jiff::Timestamp;

use kiosk::{
    account::SignupForm,
    app::{App, Command, Outcome},
};

#[derive(Debug, Args)]
pub(crate) struct SignupArgs {
    /// Full name
    #[arg(long)]
    name: String,

    /// Postal address
    #[arg(long, default_value = "")]
    address: String,

    /// Contact number
    #[arg(long)]
    number: String,

    /// Email address
    #[arg(long)]
    email: String,

    /// Password (at least 4 characters)
    #[arg(long)]
    password: String,

    /// Password confirmation
    #[arg(long)]
    confirm: String,
}

pub(crate) fn signup(app: &mut App, args: SignupArgs) -> Result<(), String> {
    let form = SignupForm {
        name: args.name,
        address: args.address,
        number: args.number,
        email: args.email,
        password: args.password,
        confirm: args.confirm,
    };

    let outcome = app
        .handle(Command::Signup { form }, Timestamp::now())
        .map_err(|err| err.to_string())?;

    let Outcome::SignedIn(session) = outcome else {
        return Err("unexpected outcome for signup".to_owned());
    };

    println!("Welcome, {}. You are signed in.", session.name);

    Ok(())
}

#[derive(Debug, Args)]
pub(crate) struct LoginArgs {
    /// Email (case-insensitive) or contact number (exact)
    who: String,

    /// Password
    #[arg(long)]
    password: String,
}

pub(crate) fn login(app: &mut App, args: LoginArgs) -> Result<(), String> {
    let outcome = app
        .handle(
            Command::Login {
                who: args.who,
                password: args.password,
            },
            Timestamp::now(),
        )
        .map_err(|err| err.to_string())?;

    let Outcome::SignedIn(session) = outcome else {
        return Err("unexpected outcome for login".to_owned());
    };

    println!("Welcome back, {}.", session.name);

    Ok(())
}

pub(crate) fn logout(app: &mut App) -> Result<(), String> {
    app.handle(Command::Logout, Timestamp::now())
        .map_err(|err| err.to_string())?;

    println!("Signed out.");

    Ok(())
}

pub(crate) fn profile(app: &App) -> Result<(), String> {
    let Some(session) = app.session() else {
        println!("Not signed in.");

        return Ok(());
    };

    println!("{} ({})", session.name, session.initials());
    println!("Email:  {}", session.email);
    println!("Number: {}", session.number);

    Ok(())
}
