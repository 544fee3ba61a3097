//! Login arguments.

use clap::Args;

#[derive(Args, Debug)]
pub struct LoginArgs {
	/// Account email
	pub email: String,

	/// Account password
	#[arg(short, long, env = "MARKET_PASSWORD", hide_env_values = true)]
	pub password: String,
}
