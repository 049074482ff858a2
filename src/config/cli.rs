use crate::app::request::Request;
use clap::{Parser, Subcommand};

#[derive(Debug, Clone, Parser)]
#[command(name = "city-info")]
#[command(about = "Cities and their points of interest")]
pub struct CliConfig {
    #[arg(long, help = "TOML configuration file")]
    pub config: Option<String>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Use the blocking call paths instead of the async ones")]
    pub blocking: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// List cities ordered by name
    Cities,
    /// Every city with its points of interest
    AllCityInfo,
    /// One city
    City {
        id: i32,
        #[arg(long)]
        include_points_of_interest: bool,
    },
    /// Points of interest of a city
    Points { city_id: i32 },
    /// One point of interest
    Point { city_id: i32, id: i32 },
    /// Create a point of interest from a JSON body
    AddPoint {
        city_id: i32,
        #[arg(long)]
        body: String,
    },
    /// Replace a point of interest from a JSON body
    UpdatePoint {
        city_id: i32,
        id: i32,
        #[arg(long)]
        body: String,
    },
    /// Apply a JSON patch document to a point of interest
    PatchPoint {
        city_id: i32,
        id: i32,
        #[arg(long)]
        body: String,
    },
    /// Delete a point of interest
    DeletePoint { city_id: i32, id: i32 },
    /// Store health check
    Status,
    /// Application version
    Version,
}

impl From<Command> for Request {
    fn from(command: Command) -> Self {
        match command {
            Command::Cities => Request::Cities,
            Command::AllCityInfo => Request::AllCityInfo,
            Command::City {
                id,
                include_points_of_interest,
            } => Request::City {
                id,
                include_points_of_interest,
            },
            Command::Points { city_id } => Request::PointsOfInterest { city_id },
            Command::Point { city_id, id } => Request::PointOfInterest { city_id, id },
            Command::AddPoint { city_id, body } => Request::CreatePointOfInterest { city_id, body },
            Command::UpdatePoint { city_id, id, body } => {
                Request::UpdatePointOfInterest { city_id, id, body }
            }
            Command::PatchPoint { city_id, id, body } => {
                Request::PatchPointOfInterest { city_id, id, body }
            }
            Command::DeletePoint { city_id, id } => Request::DeletePointOfInterest { city_id, id },
            Command::Status => Request::Status,
            Command::Version => Request::Version,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_patch_command() {
        let cli = CliConfig::parse_from([
            "city-info",
            "--blocking",
            "patch-point",
            "1",
            "5",
            "--body",
            r#"[{"op":"replace","path":"/name","value":"Park2"}]"#,
        ]);
        assert!(cli.blocking);
        assert_eq!(
            Request::from(cli.command),
            Request::PatchPointOfInterest {
                city_id: 1,
                id: 5,
                body: r#"[{"op":"replace","path":"/name","value":"Park2"}]"#.to_string(),
            }
        );
    }

    #[test]
    fn test_city_flag_includes_points() {
        let cli = CliConfig::parse_from(["city-info", "city", "3", "--include-points-of-interest"]);
        assert_eq!(
            Request::from(cli.command),
            Request::City {
                id: 3,
                include_points_of_interest: true,
            }
        );
    }
}
