use super::toml_config::TomlConfig;
use super::{Overrides, Settings, API_KEY_ENV};
use crate::domain::model::StudentInfo;
use crate::utils::error::Result;
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "shodan-report")]
#[command(about = "Search Shodan and print every match plus an address/port summary")]
pub struct CliConfig {
    #[arg(
        short,
        long,
        help = "Shodan search filter, e.g. city:\"Jalapa\" country:\"GT\". org: is not allowed [default: country:\"GT\"]"
    )]
    pub filter: Option<String>,

    #[arg(short = 'k', long, help = "Shodan API key (falls back to SHODAN_API_KEY)")]
    pub api_key: Option<String>,

    #[arg(short, long, help = "Maximum number of results to retrieve (default: all)")]
    pub max_results: Option<usize>,

    #[arg(long, help = "Student ID number")]
    pub carnet: String,

    #[arg(long, help = "Student full name")]
    pub name: String,

    #[arg(long, help = "Course")]
    pub course: String,

    #[arg(long, help = "Section")]
    pub section: String,

    #[arg(short, long, help = "Optional TOML settings file")]
    pub config: Option<PathBuf>,

    #[arg(long, help = "Shodan API base URL")]
    pub endpoint: Option<String>,

    #[arg(long, help = "Per-request timeout in seconds")]
    pub timeout_seconds: Option<u64>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub json_logs: bool,
}

impl CliConfig {
    pub fn overrides(&self) -> Overrides {
        Overrides {
            filter: self.filter.clone(),
            api_key: self.api_key.clone(),
            max_results: self.max_results,
            endpoint: self.endpoint.clone(),
            timeout_seconds: self.timeout_seconds,
        }
    }

    pub fn student(&self) -> StudentInfo {
        StudentInfo {
            carnet: self.carnet.clone(),
            name: self.name.clone(),
            course: self.course.clone(),
            section: self.section.clone(),
        }
    }

    /// Reads the config file (if any) and the environment exactly once.
    pub fn load_settings(&self) -> Result<Settings> {
        let file = self
            .config
            .as_ref()
            .map(TomlConfig::from_file)
            .transpose()?;
        Settings::resolve(
            self.overrides(),
            file.as_ref(),
            std::env::var(API_KEY_ENV).ok(),
            self.student(),
        )
    }
}
