//! Operator CLI for the Sybil verifier.
//!
//! `sign` produces the post text a claimant publishes; `verify` asks a running
//! service to check it.

use clap::{Parser, Subcommand};

use sybil_verifier::http::X_REQUEST_ID;
use sybil_verifier::verify::{checksum, ClaimSigner};

#[derive(Parser)]
#[command(name = "verifier-cli")]
#[command(about = "Sign and submit Sybil verification claims", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign the claim for a handle with the key in VERIFIER_SIGNING_KEY
    Sign {
        #[arg(long)]
        handle: String,
    },
    /// Ask a running verifier to check a post
    Verify {
        #[arg(short, long, default_value = "http://localhost:8080/api")]
        url: String,

        /// Post id
        #[arg(long)]
        id: String,

        /// Address the post claims, EIP-55 checksummed
        #[arg(long)]
        account: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Sign { handle } => {
            let signer = ClaimSigner::from_env()?;
            println!("address: {}", checksum(&signer.address()));
            println!("{}", signer.claim_text(&handle).await?);
        }
        Commands::Verify { url, id, account } => {
            let endpoint = format!("{}/verify", url.trim_end_matches('/'));
            let res = reqwest::Client::new()
                .get(endpoint)
                .query(&[("id", id.as_str()), ("account", account.as_str())])
                .send()
                .await?;
            print_response(res).await?;
        }
    }

    Ok(())
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    let request_id = res
        .headers()
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("-")
        .to_string();
    let body = res.text().await?;

    if status.is_success() {
        println!("verified {} (request {})", body, request_id);
    } else {
        eprintln!("Error: verifier returned status {}", status);
        if !body.is_empty() {
            eprintln!("Response: {}", body);
        }
        eprintln!("Request: {}", request_id);
    }
    Ok(())
}
