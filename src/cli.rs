// src/cli.rs - CLI definition (clap derive)

use clap::Parser;

use crate::config::DEFAULT_REGION;

#[derive(Parser, Debug)]
#[command(name = "libre-probe", about = "LibreLinkUp API smoke test", version)]
pub struct Cli {
    /// LibreLinkUp email
    #[arg(long, env = "LIBRE_EMAIL")]
    pub email: Option<String>,

    /// LibreLinkUp password
    #[arg(long, env = "LIBRE_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Region code (eu/us/ae/etc)
    #[arg(long, env = "LIBRE_REGION", default_value = DEFAULT_REGION)]
    pub region: String,

    /// Report the measurement embedded in the connections payload when
    /// there is one, without fetching the graph
    #[arg(long)]
    pub skip_graph: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flags() {
        let cli = Cli::try_parse_from([
            "libre-probe",
            "--email",
            "you@example.com",
            "--password",
            "Secret",
            "--region",
            "us",
            "--skip-graph",
        ])
        .expect("flags should parse");
        assert_eq!(cli.email.as_deref(), Some("you@example.com"));
        assert_eq!(cli.password.as_deref(), Some("Secret"));
        assert_eq!(cli.region, "us");
        assert!(cli.skip_graph);
    }

    #[test]
    fn test_unknown_flag_rejected() {
        assert!(Cli::try_parse_from(["libre-probe", "--username", "x"]).is_err());
    }
}
