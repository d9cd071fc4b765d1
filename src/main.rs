mod helpers;
mod logger;
mod sync;

use std::path::PathBuf;

use anyhow::{Context, Result};

use clap::Parser;

use helpers::{AliasKind, Helpers};
use sync::{Job, Target};

/// Appends convenience aliases to generated Supabase types and writes them out.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// JSON file holding the generated definitions under "types"
    #[arg(short, long, default_value = "supabase/types.json")]
    input: PathBuf,

    /// TypeScript file to overwrite
    #[arg(short, long, default_value = "src/types/supabase.ts")]
    output: PathBuf,

    /// Table to alias, as <name> or <Alias>=<name>. Replaces the default set
    #[arg(short, long = "table", value_name = "SPEC")]
    tables: Vec<String>,

    /// Enum to alias, as <name> or <Alias>=<name>. Replaces the default set
    #[arg(short, long = "enum", value_name = "SPEC")]
    enums: Vec<String>,

    /// Print the result instead of writing the output file
    #[arg(long)]
    stdout: bool,

    /// Debug logging on stderr
    #[arg(short, long)]
    verbose: bool,
}

fn or_default(specs: &[String], kind: AliasKind) -> Vec<String> {
    if specs.is_empty() {
        return helpers::default_specs(kind);
    }

    specs.to_vec()
}

impl Args {
    fn helpers(&self) -> Result<Helpers> {
        if self.tables.is_empty() && self.enums.is_empty() {
            return Ok(Helpers::standard()?);
        }

        Ok(Helpers::from_specs(
            &or_default(&self.tables, AliasKind::Table),
            &or_default(&self.enums, AliasKind::Enum),
        )?)
    }

    fn into_job(self) -> Result<Job> {
        let helpers = self.helpers().context("building helper aliases")?;
        let target = if self.stdout {
            Target::Stdout
        } else {
            Target::File(self.output)
        };
        Ok(Job {
            source: self.input,
            target,
            helpers,
        })
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    logger::init(args.verbose);

    let job = args.into_job()?;
    let outcome = job.run().context("updating type definitions")?;
    tracing::debug!(bytes = outcome.bytes, "done");

    if let Target::File(path) = &outcome.target {
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        println!("Successfully updated {}", name);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Args::command().debug_assert();
    }

    #[test]
    fn defaults_reproduce_fixed_template() {
        let job = Args::try_parse_from(["supagen"]).unwrap().into_job().unwrap();
        assert_eq!(job.source, PathBuf::from("supabase/types.json"));
        assert_eq!(job.target, Target::File(PathBuf::from("src/types/supabase.ts")));
        assert_eq!(job.helpers.to_string(), Helpers::standard().unwrap().to_string());
    }

    #[test]
    fn tables_replace_only_the_table_set() {
        let args = Args::try_parse_from(["supagen", "-t", "orders", "--table", "Person=people"]).unwrap();
        let job = args.into_job().unwrap();

        let tables: Vec<&str> = job.helpers.tables().iter().map(|a| a.alias()).collect();
        assert_eq!(tables, ["Order", "Person"]);
        assert_eq!(job.helpers.enums().len(), Helpers::standard().unwrap().enums().len());
    }

    #[test]
    fn stdout_flag_selects_stdout() {
        let args = Args::try_parse_from(["supagen", "--stdout", "-i", "in.json"]).unwrap();
        let job = args.into_job().unwrap();
        assert_eq!(job.target, Target::Stdout);
        assert_eq!(job.source, PathBuf::from("in.json"));
    }

    #[test]
    fn bad_alias_is_reported() {
        let args = Args::try_parse_from(["supagen", "-e", "not-valid"]).unwrap();
        let err = args.into_job().unwrap_err();
        assert_eq!(err.to_string(), "building helper aliases");
        assert!(err.root_cause().to_string().contains("not-valid"));
    }
}
