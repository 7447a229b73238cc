use clap::Parser;
use miette::Result;
use plateq::cli::{Cli, Commands};

fn main() -> Result<()> {
    // Reset SIGPIPE to default behavior (terminate silently) for proper Unix piping.
    // Without this, piping to `head`, `grep -q`, etc. causes a panic on broken pipe.
    #[cfg(unix)]
    {
        unsafe {
            libc::signal(libc::SIGPIPE, libc::SIG_DFL);
        }
    }
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .tab_width(4)
                .build(),
        )
    }))?;

    let cli = Cli::parse();
    let global = cli.global;
    plateq::core::logging::init(global.verbose);

    match cli.command {
        Commands::Init(args) => plateq::cli::commands::init::run(args),
        Commands::Rates(cmd) => plateq::cli::commands::rates::run(cmd, &global),
        Commands::Labor(args) => plateq::cli::commands::labor::run(args, &global),
        Commands::Rack(args) => plateq::cli::commands::rack::run(args, &global),
        Commands::Quote(cmd) => plateq::cli::commands::quote::run(cmd, &global),
        Commands::Extract(args) => plateq::cli::commands::extract::run(args, &global),
        Commands::Completions(args) => plateq::cli::commands::completions::run(args),
    }
}
