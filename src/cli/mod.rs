use clap::Subcommand;

#[derive(Subcommand)]
pub enum Commands {
    /// Ask one question and record the answer in the user's history
    Invoke {
        /// User identity; defaults to the configured demo user
        #[arg(short, long)]
        user_key: Option<String>,

        /// Question text; defaults to the configured demo question
        #[arg(short, long)]
        question: Option<String>,

        /// Read the invocation event JSON from a file, or `-` for stdin
        #[arg(short, long)]
        event: Option<String>,
    },

    /// Show the stored conversation for a user
    History {
        #[arg(short, long)]
        user_key: Option<String>,

        /// Print the turns as JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Run the HTTP trigger (`POST /invoke`, `GET /health`)
    Serve {
        #[arg(long, default_value = "8080")]
        port: u16,

        /// Bind to 0.0.0.0 instead of 127.0.0.1, exposing the server on all network interfaces
        #[arg(long)]
        public: bool,
    },
}
