use std::fs;
use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result, bail};
use clap::{Parser, ValueEnum};

use umgpp_core::config::ConfigLoader;
use umgpp_core::rover::VirtualRover;
use umgpp_core::rover_link::RoverLink;
use umgpp_core::store::ProgramStore;
use umgpp_core::umgpp::{CompileOutcome, compile};
use umgpp_core::{log_eprintln, log_println, logger};

#[derive(Parser, Debug)]
#[command(
    name = "umgpp",
    version,
    about = "UMG++ compiler for the UMG Basic Rover 2.0",
    long_about = "Compiles UMG++ motion programs into a Python driver script and a flat\n\
        command list, and can send the commands to the rover, simulate them on a\n\
        virtual rover, or store programs per user."
)]
struct Cli {
    /// UMG++ source file to compile
    #[arg(value_name = "FILE")]
    source: Option<PathBuf>,

    /// Compile source text given directly on the command line
    #[arg(long, value_name = "SOURCE", conflicts_with = "source")]
    inline: Option<String>,

    /// What to print for a successful compilation
    #[arg(long, value_enum, default_value_t = Emit::Commands)]
    emit: Emit,

    /// Send the compiled command list to the rover
    #[arg(long)]
    send: bool,

    /// Run the compiled command list on the virtual rover
    #[arg(long)]
    simulate: bool,

    /// Tell the rover to stop immediately and exit
    #[arg(long)]
    stop: bool,

    /// Ask the rover for its status and exit
    #[arg(long)]
    status: bool,

    /// Save the source file into the program store before compiling
    #[arg(long)]
    save: bool,

    /// User the stored programs belong to
    #[arg(long, value_name = "USER", default_value = "anon")]
    user: String,

    /// List the user's stored programs and exit
    #[arg(long)]
    programs: bool,

    /// Rover base URL, overriding the configuration file
    #[arg(long, value_name = "URL")]
    url: Option<String>,

    /// Request timeout in seconds, overriding the configuration file
    #[arg(long, value_name = "SECONDS")]
    timeout_secs: Option<u64>,

    /// Also write logs to the rotating log file
    #[arg(long)]
    log_file: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Emit {
    /// The generated Python driver script
    Driver,
    /// The flat command list, one command per line
    Commands,
    /// The full compilation report as JSON
    Json,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    logger::init_standalone();
    if cli.log_file {
        logger::set_full_mode();
    }

    let loader = ConfigLoader::new()?;
    let mut config = loader.load_or_create()?;
    if let Some(url) = &cli.url {
        config.rover.url = url.clone();
    }
    if let Some(secs) = cli.timeout_secs {
        config.rover.timeout_secs = secs;
    }

    // Rover and store queries need no source program.
    if cli.stop {
        let link = RoverLink::from_config(&config.rover)?;
        let reply = link.stop().await?;
        println!("{}", reply);
        return Ok(());
    }
    if cli.status {
        let link = RoverLink::from_config(&config.rover)?;
        let reply = link.status().await?;
        println!("{}", reply);
        return Ok(());
    }
    if cli.programs {
        let store = ProgramStore::new(&config.storage.programs_dir);
        let programs = store.list(&cli.user)?;
        if programs.is_empty() {
            log_println!("no programs stored for user '{}'", cli.user);
        }
        for info in &programs {
            println!("{}  ({} bytes)", info.name, info.size);
        }
        return Ok(());
    }

    let (source, file_stem) = match (&cli.source, &cli.inline) {
        (Some(path), None) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("Failed to read source file {}", path.display()))?;
            let stem = path
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned());
            (text, stem)
        }
        (None, Some(text)) => (text.clone(), None),
        _ => bail!("nothing to do: pass a source file, --inline, or one of --stop/--status/--programs"),
    };

    if cli.save {
        let name = file_stem
            .as_deref()
            .context("--save needs a source file, not --inline")?;
        let store = ProgramStore::new(&config.storage.programs_dir);
        let path = store.save(&cli.user, name, &source)?;
        log_println!("saved program '{}' for user '{}' at {}", name, cli.user, path.display());
    }

    let outcome = compile(&source);
    let (driver_script, commands) = match &outcome {
        CompileOutcome::Success {
            driver_script,
            commands,
            ..
        } => (driver_script.clone(), commands.clone()),
        CompileOutcome::Failure { stage, errors } => {
            if cli.emit == Emit::Json {
                println!("{}", serde_json::to_string_pretty(&outcome.to_report())?);
            } else {
                log_eprintln!(
                    "compilation failed at the {} stage with {} error(s)",
                    stage,
                    errors.len()
                );
                for message in errors.messages() {
                    log_eprintln!("  {}", message);
                }
            }
            process::exit(1);
        }
    };

    match cli.emit {
        Emit::Driver => println!("{}", driver_script),
        Emit::Commands => {
            for command in &commands {
                println!("{}", command);
            }
        }
        Emit::Json => println!("{}", serde_json::to_string_pretty(&outcome.to_report())?),
    }

    if cli.simulate {
        let mut rover = VirtualRover::new();
        let report = rover
            .execute(&commands)
            .context("generated commands failed to execute")?;
        log_println!("simulated {} command(s)", report.executed);
        log_println!(
            "final pose: ({:.2}, {:.2}) cm, heading {:.1} degrees",
            report.pose.x,
            report.pose.y,
            report.pose.orientation
        );
        log_println!("distance travelled: {:.2} cm", report.distance_travelled);
    }

    if cli.send {
        let link = RoverLink::from_config(&config.rover)?;
        let reply = link.run_program(&commands).await?;
        log_println!("rover accepted the program: {}", reply);
    }

    Ok(())
}
