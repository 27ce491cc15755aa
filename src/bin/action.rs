//! Entry point for CI actions: flags come from `INPUT_*` variables.

use setup_npm_auth::action::ActionInputs;
use setup_npm_auth::cli;
use setup_npm_auth::ProcessEnv;
use std::process::ExitCode;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    cli::init_tracing();

    let inputs = match ActionInputs::from_env(&ProcessEnv) {
        Ok(inputs) => inputs,
        Err(err) => return cli::exit_code::<()>(Err(err)),
    };

    let argv = std::iter::once("setup-npm-auth".to_string()).chain(inputs.to_args());
    let args = match cli::parse_args(argv) {
        Ok(args) => args,
        Err(code) => return code,
    };

    cli::exit_code(cli::execute(args).await)
}
