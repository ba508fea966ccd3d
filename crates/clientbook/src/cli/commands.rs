//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};

use crate::client::{ClientDraft, ClientId};

/// List command arguments.
#[derive(Debug, Args)]
pub struct ListCommand {
    /// Only show clients whose name contains this text (case-insensitive)
    pub query: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

/// Client record fields shared by `add` and `edit`.
#[derive(Debug, Clone, Default, Args)]
pub struct ClientFields {
    /// Full name
    #[arg(short, long)]
    pub name: Option<String>,

    /// Contact email
    #[arg(short, long)]
    pub email: Option<String>,

    /// Start date (YYYY-MM-DD)
    #[arg(short, long, value_name = "DATE")]
    pub start_date: Option<String>,

    /// Age in years
    #[arg(long)]
    pub age: Option<u32>,

    /// Gender
    #[arg(long)]
    pub gender: Option<String>,

    /// Contact phone number
    #[arg(long)]
    pub phone: Option<String>,

    /// Fitness goal
    #[arg(short, long)]
    pub goal: Option<String>,
}

impl ClientFields {
    /// Build a new draft; fields not given are left empty.
    #[must_use]
    pub fn into_draft(self) -> ClientDraft {
        let mut draft = ClientDraft::default();
        self.apply_to(&mut draft);
        draft
    }

    /// Overwrite the fields that were given, keeping the rest.
    pub fn apply_to(self, draft: &mut ClientDraft) {
        if let Some(name) = self.name {
            draft.full_name = name;
        }
        if let Some(email) = self.email {
            draft.email = email;
        }
        if let Some(start_date) = self.start_date {
            draft.start_date = start_date;
        }
        if let Some(age) = self.age {
            draft.age = Some(age);
        }
        if let Some(gender) = self.gender {
            draft.gender = Some(gender);
        }
        if let Some(phone) = self.phone {
            draft.phone = Some(phone);
        }
        if let Some(goal) = self.goal {
            draft.fitness_goal = goal;
        }
    }
}

/// Add command arguments.
#[derive(Debug, Args)]
pub struct AddCommand {
    /// Fields of the new client; name, email and start date are required
    #[command(flatten)]
    pub fields: ClientFields,
}

/// Optional fields `edit` can unset.
#[derive(Debug, Clone, Copy, Default, Args)]
pub struct ClearFields {
    /// Remove the stored age
    #[arg(long, conflicts_with = "age")]
    pub clear_age: bool,

    /// Remove the stored gender
    #[arg(long, conflicts_with = "gender")]
    pub clear_gender: bool,

    /// Remove the stored phone number
    #[arg(long, conflicts_with = "phone")]
    pub clear_phone: bool,
}

impl ClearFields {
    /// Unset the selected fields.
    pub fn apply_to(self, draft: &mut ClientDraft) {
        if self.clear_age {
            draft.age = None;
        }
        if self.clear_gender {
            draft.gender = None;
        }
        if self.clear_phone {
            draft.phone = None;
        }
    }
}

/// Edit command arguments.
#[derive(Debug, Args)]
pub struct EditCommand {
    /// Id of the client to edit
    pub id: String,

    /// Fields to change
    #[command(flatten)]
    pub fields: ClientFields,

    /// Fields to remove
    #[command(flatten)]
    pub clear: ClearFields,
}

impl EditCommand {
    /// Apply the requested changes to the client's current values.
    pub fn apply_to(self, draft: &mut ClientDraft) {
        self.fields.apply_to(draft);
        self.clear.apply_to(draft);
    }
}

/// Delete command arguments.
#[derive(Debug, Args)]
pub struct DeleteCommand {
    /// Id of the client to delete
    pub id: String,
}

/// Show command arguments.
#[derive(Debug, Args)]
pub struct ShowCommand {
    /// Id of the client to show
    pub id: String,

    /// Skip fetching exercise suggestions
    #[arg(long)]
    pub no_suggestions: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "plain")]
    pub format: OutputFormat,
}

/// Status command arguments.
#[derive(Debug, Args)]
pub struct StatusCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

/// Output format for commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Plain text output
    #[default]
    Plain,
    /// Formatted table
    Table,
    /// JSON output
    Json,
}

/// Parse a client id given on the command line.
#[must_use]
pub fn client_id(raw: &str) -> ClientId {
    ClientId::from(raw.trim())
}
