use clap::{Args, Subcommand};
use tripcart_app::context::AppContext;

#[derive(Debug, Args)]
pub(crate) struct SessionCommand {
    #[command(subcommand)]
    command: SessionSubcommand,
}

#[derive(Debug, Subcommand)]
enum SessionSubcommand {
    Show,
    Logout,
}

pub(crate) fn run(ctx: &mut AppContext, command: SessionCommand) -> Result<(), String> {
    match command.command {
        SessionSubcommand::Show => {
            let Some(user) = ctx.storefront.session().user() else {
                println!("not signed in");
                return Ok(());
            };

            println!("user_id: {}", user.id);
            println!("name: {}", user.name.as_deref().unwrap_or("-"));
            println!("email: {}", user.email.as_deref().unwrap_or("-"));
            println!("mobile: {}", user.mobile.as_deref().unwrap_or("-"));
            println!("role: {}", user.role.as_deref().unwrap_or("customer"));
            println!("authenticated: {}", user.is_authenticated);

            Ok(())
        }
        SessionSubcommand::Logout => {
            ctx.storefront.session_mut().logout();
            println!("signed out");
            Ok(())
        }
    }
}
