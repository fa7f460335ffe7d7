//! List command - show the declarations guardgen can see.

use clap::Args;
use serde::Serialize;

#[derive(Args, Debug)]
pub struct ListArgs {
    /// TypeScript files, directories or glob patterns
    #[arg(required = true)]
    pub files: Vec<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Serialize)]
struct ListEntry<'a> {
    name: &'a str,
    kind: &'static str,
    exported: bool,
    file: String,
}

pub fn run(args: ListArgs) -> anyhow::Result<()> {
    let inputs = super::expand_inputs(&args.files)?;
    let index = super::load_index(&inputs)?;

    let entries: Vec<ListEntry> = index
        .iter()
        .map(|(decl, path)| ListEntry {
            name: &decl.name,
            kind: decl.kind_name(),
            exported: decl.exported,
            file: path.display().to_string(),
        })
        .collect();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    for entry in &entries {
        let export = if entry.exported { "export " } else { "" };
        println!("{export}{} {}  {}", entry.kind, entry.name, entry.file);
    }
    Ok(())
}
