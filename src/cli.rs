//! Command-line arguments and the dispatch from each subcommand to the library.

use crate::error::{ErrorKind, Result};
use clap::{ArgAction, Args, Parser, Subcommand};
use exn::ResultExt;
use quire_library::{Edit, Library, parse_selector};
use std::io::{Read, Write};
use std::path::PathBuf;

/// Personal writing library: works, their chapters, and the index tying them together.
#[derive(Debug, Parser)]
#[command(name = "quire", version, about)]
pub struct Cli {
    /// Storage directory holding `index.json` and the work directories.
    #[arg(long, global = true, value_name = "DIR")]
    pub root: Option<PathBuf>,
    /// Configuration file to use instead of the per-user one.
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,
    /// Log more; repeat for more detail.
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage works.
    #[command(subcommand)]
    Works(WorksCommand),
    /// Manage the chapters of a work.
    #[command(subcommand)]
    Chapters(ChaptersCommand),
}

#[derive(Debug, Subcommand)]
pub enum WorksCommand {
    /// List every work.
    List,
    /// Create an empty work.
    Create {
        title: String,
        #[arg(default_value = "")]
        description: String,
    },
    /// Delete a work with all of its chapters.
    Delete {
        /// Position of the work, as shown by `works list`.
        work: String,
    },
}

#[derive(Debug, Subcommand)]
pub enum ChaptersCommand {
    /// List the chapters of a work.
    List { work: String },
    /// Append a chapter to a work.
    Add {
        work: String,
        title: String,
        #[command(flatten)]
        body: BodyArgs,
    },
    /// Print a chapter.
    Show { work: String, chapter: String },
    /// Change the title of a chapter.
    Rename { work: String, chapter: String, title: String },
    /// Replace the body of a chapter.
    Edit {
        work: String,
        chapter: String,
        #[command(flatten)]
        body: BodyArgs,
    },
    /// Delete a chapter.
    Delete { work: String, chapter: String },
}

#[derive(Debug, Args)]
pub struct BodyArgs {
    /// Chapter body text.
    #[arg(conflicts_with = "body_file")]
    pub body: Option<String>,
    /// Read the body from a file, or from stdin when given `-`.
    #[arg(long, value_name = "FILE")]
    pub body_file: Option<PathBuf>,
}
impl BodyArgs {
    fn read(&self) -> Result<String> {
        match (&self.body, &self.body_file) {
            (Some(body), _) => Ok(body.clone()),
            (None, Some(path)) if path.as_os_str() == "-" => {
                let mut body = String::new();
                std::io::stdin().read_to_string(&mut body).or_raise(|| ErrorKind::ReadInput(path.clone()))?;
                Ok(body)
            },
            (None, Some(path)) => std::fs::read_to_string(path).or_raise(|| ErrorKind::ReadInput(path.clone())),
            (None, None) => Ok(String::new()),
        }
    }
}

fn select(input: &str) -> Result<usize> {
    parse_selector(input).or_raise(|| ErrorKind::Command)
}

impl Command {
    /// Runs the command against `library`, writing what it has to say to `out`.
    pub fn run(self, library: &mut Library, out: &mut impl Write) -> Result<()> {
        match self {
            Self::Works(command) => command.run(library, out),
            Self::Chapters(command) => command.run(library, out),
        }
    }
}

impl WorksCommand {
    fn run(self, library: &mut Library, out: &mut impl Write) -> Result<()> {
        let output = match self {
            Self::List => {
                let works = library.list_works();
                if works.is_empty() {
                    return writeln!(out, "No works yet.").or_raise(|| ErrorKind::Output);
                }
                let mut listing = String::new();
                for (i, work) in works.iter().enumerate() {
                    listing.push_str(&format!("{}. {} [{}]", i + 1, work.title, work.code()));
                    if !work.description.is_empty() {
                        listing.push_str(&format!(" - {}", work.description));
                    }
                    listing.push('\n');
                }
                listing
            },
            Self::Create { title, description } => {
                let work = library.create_work(&title, &description).or_raise(|| ErrorKind::Command)?;
                format!("Created work \"{}\" with code {}\n", work.title, work.code())
            },
            Self::Delete { work } => {
                let work = library.delete_work(select(&work)?).or_raise(|| ErrorKind::Command)?;
                format!("Deleted work \"{}\"\n", work.title)
            },
        };
        out.write_all(output.as_bytes()).or_raise(|| ErrorKind::Output)
    }
}

impl ChaptersCommand {
    fn run(self, library: &mut Library, out: &mut impl Write) -> Result<()> {
        let output = match self {
            Self::List { work } => {
                let chapters = library.list_chapters(select(&work)?).or_raise(|| ErrorKind::Command)?;
                match chapters.is_empty() {
                    true => "No chapters yet.\n".to_string(),
                    false => chapters.iter().enumerate().map(|(i, c)| format!("{}. {}\n", i + 1, c.title)).collect(),
                }
            },
            Self::Add { work, title, body } => {
                let body = body.read()?;
                let chapter = library.add_chapter(select(&work)?, &title, &body).or_raise(|| ErrorKind::Command)?;
                format!("Added chapter \"{}\"\n", chapter.title)
            },
            Self::Show { work, chapter } => {
                let text = library.read_chapter(select(&work)?, select(&chapter)?).or_raise(|| ErrorKind::Command)?;
                format!("{}\n\n{}\n", text.title, text.body)
            },
            Self::Rename { work, chapter, title } => {
                let edit = library
                    .edit_chapter_title(select(&work)?, select(&chapter)?, &title)
                    .or_raise(|| ErrorKind::Command)?;
                match edit {
                    Edit::Updated => format!("Renamed chapter to \"{}\"\n", title.trim()),
                    Edit::Unchanged => "No title given; chapter left unchanged.\n".to_string(),
                }
            },
            Self::Edit { work, chapter, body } => {
                let body = body.read()?;
                let edit = library
                    .edit_chapter_body(select(&work)?, select(&chapter)?, &body)
                    .or_raise(|| ErrorKind::Command)?;
                match edit {
                    Edit::Updated => "Chapter body updated.\n".to_string(),
                    Edit::Unchanged => "No body given; chapter left unchanged.\n".to_string(),
                }
            },
            Self::Delete { work, chapter } => {
                let chapter = library.delete_chapter(select(&work)?, select(&chapter)?).or_raise(|| ErrorKind::Command)?;
                format!("Deleted chapter \"{}\"\n", chapter.title)
            },
        };
        out.write_all(output.as_bytes()).or_raise(|| ErrorKind::Output)
    }
}
