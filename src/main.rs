use anyhow::Result;
use clap::{Parser, Subcommand};
use is_terminal::IsTerminal;
use minus::{page_all, Pager};
use vit::areas::repository::Repository;
use vit::artifacts::core::PagerWriter;

#[derive(Parser)]
#[command(
    name = "vit",
    version = "0.1.0",
    about = "A minimal content-addressable version control system",
    long_about = "Vit tracks the history of a directory through snapshots: \
    files are stored as zlib-compressed objects addressed by content hash, \
    the index stages the next snapshot, and branches and HEAD name positions \
    in the resulting commit chain.",
    help_template = r"
{name} {version} - {about}

USAGE:
    {usage}

OPTIONS:
    {all-args}
",
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(
        name = "init",
        about = "Initialize a new repository",
        long_about = "This command initializes a new repository in the current directory or at the specified path."
    )]
    Init {
        #[arg(index = 1, help = "The path to the repository")]
        path: Option<String>,
    },
    #[command(
        name = "add",
        about = "Stage the working tree for the next commit",
        long_about = "This command stores every file of the working tree as a blob and rebuilds the index from the result."
    )]
    Add,
    #[command(
        name = "commit",
        about = "Create a new commit with the specified message",
        long_about = "This command records the staged index as a new commit on the current branch."
    )]
    Commit {
        #[arg(short, long, help = "The commit message")]
        message: String,
    },
    #[command(
        name = "log",
        about = "Show the commit history",
        long_about = "This command walks the commit chain from HEAD down to the root commit and prints one block per commit, newest first."
    )]
    Log,
    #[command(
        name = "checkout",
        about = "Move HEAD to a branch or to a commit from the current history",
        long_about = "This command rebuilds the working tree and the index from the target commit. \
        Checking out a commit hash detaches HEAD; checking out a branch attaches HEAD to it.",
        group(clap::ArgGroup::new("target").required(true).multiple(false))
    )]
    Checkout {
        #[arg(
            short = 'c',
            long,
            group = "target",
            help = "The commit hash to detach HEAD at"
        )]
        commit: Option<String>,
        #[arg(short = 'b', long, group = "target", help = "The branch to switch to")]
        branch: Option<String>,
    },
    #[command(
        name = "status",
        about = "Show staged, unstaged and untracked changes",
        long_about = "This command compares the working tree, the index and the HEAD tree, and reports the differences."
    )]
    Status {
        #[arg(
            long,
            required = false,
            help = "Print a machine-readable XY <path> record per change"
        )]
        porcelain: bool,
    },
    #[command(
        name = "diff",
        about = "Show unstaged changes as line diffs",
        long_about = "This command renders a line diff between each staged blob and the current content of the corresponding working tree file."
    )]
    Diff,
    #[command(
        name = "cat-file",
        about = "Print the content of an object",
        long_about = "This command prints the stored text of an object. \
        It accepts a full object SHA, a unique SHA prefix, or a revision such as HEAD or a branch name."
    )]
    CatFile {
        #[arg(short = 'p', long, help = "The object SHA to print")]
        object: String,
    },
    #[command(
        name = "hash-object",
        about = "Hash an object and optionally write it to the object database",
        long_about = "This command hashes an object file and can write it to the object database. \
        It requires the path to the file to be specified."
    )]
    HashObject {
        #[arg(
            short,
            long,
            required = false,
            help = "Write the object to the object database"
        )]
        write: bool,
        #[arg(index = 1)]
        file: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match &cli.command {
        Commands::Init { path } => {
            let repository = match path {
                Some(path) => Repository::open(path, Box::new(std::io::stdout()))?,
                None => Repository::open(".", Box::new(std::io::stdout()))?,
            };

            repository.init()?
        }
        Commands::Add => {
            let repository = Repository::discover(".", Box::new(std::io::stdout()))?;

            repository.add()?
        }
        Commands::Commit { message } => {
            let repository = Repository::discover(".", Box::new(std::io::stdout()))?;

            repository.commit(message.as_str())?
        }
        Commands::Log => {
            // page the history when stdout is an interactive terminal
            if std::io::stdout().is_terminal() && std::env::var_os("NO_PAGER").is_none() {
                let pager = Pager::new();
                let repository =
                    Repository::discover(".", Box::new(PagerWriter::new(pager.clone())))?;

                repository.log()?;
                page_all(pager)?
            } else {
                let repository = Repository::discover(".", Box::new(std::io::stdout()))?;

                repository.log()?
            }
        }
        Commands::Checkout { commit, branch } => {
            let repository = Repository::discover(".", Box::new(std::io::stdout()))?;

            if let Some(commit) = commit {
                repository.checkout_commit(commit)?
            } else if let Some(branch) = branch {
                repository.checkout_branch(branch)?
            }
        }
        Commands::Status { porcelain } => {
            let repository = Repository::discover(".", Box::new(std::io::stdout()))?;

            repository.status(*porcelain)?
        }
        Commands::Diff => {
            let repository = Repository::discover(".", Box::new(std::io::stdout()))?;

            repository.diff()?
        }
        Commands::CatFile { object } => {
            let repository = Repository::discover(".", Box::new(std::io::stdout()))?;

            repository.cat_file(object)?
        }
        Commands::HashObject { write, file } => {
            let repository = Repository::discover(".", Box::new(std::io::stdout()))?;

            repository.hash_object(file, *write)?
        }
    }

    Ok(())
}
