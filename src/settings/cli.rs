use super::Parser;

#[derive(Parser, Debug)]
#[command(name = "affinity", about = "Friendship and wishlist service")]
pub struct Cli {
    /// Path to a settings file, without or with the `.toml` extension.
    #[arg(long)]
    pub settings: Option<String>,
}
