use std::collections::BTreeSet;
use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, ValueEnum};

use charscope::analysis::aggregate::divergence_report;
use charscope::analysis::AnalysisError;
use charscope::data::filter::{GenreSelection, RoleFilter};
use charscope::data::loader::load_file;
use charscope::data::model::Role;
use charscope::state::Session;

/// Filter, correlate and aggregate movie-character value rankings.
#[derive(Parser)]
#[command(name = "charscope", version, about)]
struct Cli {
    /// Input dataset (.csv or .json)
    data: PathBuf,

    /// Which derived table to print
    #[arg(long, value_enum, default_value_t = View::Divergence)]
    view: View,

    /// Keep only one role ("protagonist", "antagonist", ...); default all
    #[arg(long)]
    role: Option<String>,

    /// Keep only these genres (repeatable); default all
    #[arg(long = "genre")]
    genres: Vec<String>,

    /// Select every genre, overriding any --genre picks
    #[arg(long)]
    all_genres: bool,

    /// Highlight characters whose name contains this text (matrix view)
    #[arg(long)]
    search: Option<String>,

    /// Print the divergence table in its copy/export line format
    #[arg(long)]
    report: bool,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum View {
    /// Pairwise similarity matrix (heatmap data)
    Matrix,
    /// Antagonist-vs-protagonist divergence per top value
    Divergence,
    /// Top-value counts per genre (stacked-bar data)
    Stacked,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let dataset = load_file(&cli.data)?;
    let mut session = Session::new(dataset);

    if let Some(role) = &cli.role {
        if role != "all" {
            session.set_role(RoleFilter::Only(Role::parse(role)));
        }
    }
    if !cli.genres.is_empty() {
        let set: BTreeSet<String> = cli.genres.iter().cloned().collect();
        session.set_genres(GenreSelection::Only(set));
    }
    if cli.all_genres {
        session.select_all_genres();
    }
    if let Some(text) = &cli.search {
        session.set_search(text.clone());
    }

    let outcome = match cli.view {
        View::Matrix => print_matrix(&session),
        View::Divergence => print_divergence(&session, cli.report),
        View::Stacked => print_stacked(&session),
    };

    match outcome {
        Ok(()) => Ok(()),
        // A selection that matches nothing is a valid query result.
        Err(AnalysisError::EmptySelection) => {
            println!("no data for current selection");
            Ok(())
        }
        Err(err) => Err(err.into()),
    }
}

fn print_matrix(session: &Session) -> Result<(), AnalysisError> {
    let view = session.similarity_view()?;
    let m = &view.matrix;

    let label_width = m.names.iter().map(|n| n.len()).max().unwrap_or(0) + 2;
    for (i, name) in m.names.iter().enumerate() {
        let marker = if view.highlighted[i] { "*" } else { " " };
        print!("{marker}{name:<label_width$}");
        for value in &m.cells[i] {
            print!(" {value:+.3}");
        }
        println!("  [{}]", m.roles[i]);
    }
    Ok(())
}

fn print_divergence(session: &Session, report: bool) -> Result<(), AnalysisError> {
    let rows = session.divergence_view()?;
    if report {
        println!("{}", divergence_report(&rows));
        return Ok(());
    }

    let name_width = rows.iter().map(|r| r.value_name.len()).max().unwrap_or(0);
    for row in &rows {
        println!(
            "{:<name_width$}  {:+7.1}%   (p: {:5.1}%, a: {:5.1}%)",
            row.value_name,
            row.divergence * 100.0,
            row.p_share * 100.0,
            row.a_share * 100.0
        );
    }
    Ok(())
}

fn print_stacked(session: &Session) -> Result<(), AnalysisError> {
    let table = session.stacked_view()?;

    let name_width = table
        .categories
        .iter()
        .map(|c| c.len())
        .max()
        .unwrap_or(0);
    println!("{:<name_width$}  {}", "", table.genres.join("  "));
    for (c, category) in table.categories.iter().enumerate() {
        print!("{category:<name_width$} ");
        for (g, genre) in table.genres.iter().enumerate() {
            print!(" {:>width$}", table.counts[c][g], width = genre.len() + 1);
        }
        println!();
    }

    let movies = session.movie_view();
    println!();
    println!("{} movies in the selected genre(s)", movies.len());
    for movie in &movies {
        println!("  {} (rating {:.1}/10)", movie.title, movie.rating);
        for (name, role) in &movie.characters {
            println!("    {name} ({role})");
        }
    }
    Ok(())
}
