use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start ytt as a service.
    Daemon {
        /// Address to listen on, overrides `listen` from config.yaml
        #[clap(short, long)]
        listen: Option<String>,
    },
    /// Print the tags of a video
    Tags {
        /// Video url (watch, embed, youtu.be, shorts) or bare id
        #[clap(allow_hyphen_values = true)]
        url: String,
    },
    /// Print the thumbnail urls of a video
    Thumbnails {
        /// Video url (watch, embed, youtu.be, shorts) or bare id
        #[clap(allow_hyphen_values = true)]
        url: String,
    },
    /// Print keyword suggestions for a seed keyword
    Keywords {
        /// Seed keyword
        keyword: String,

        /// Print the count only
        #[clap(short = 'c', long, default_value = "false")]
        count: bool,
    },
}
