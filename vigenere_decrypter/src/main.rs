use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use console::style;
use polyalpha_analysis::config::DEFAULT_TOLERANCE;
use polyalpha_analysis::hypothesis::DEFAULT_CANDIDATES;
use polyalpha_analysis::{
    encipher, AnalysisConfig, Alphabet, Cryptanalysis, FixedAssignment, Language, PromptSource,
    RankSource,
};
use tracing::{debug, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Command-line arguments for the polyalphabetic cipher analyzer.
#[derive(Parser, Debug)]
struct Cli {
    /// Path to the input file containing the ciphertext (or plaintext in encrypt mode)
    #[arg(short, long, help = "Path to the input file")]
    file: PathBuf,

    /// Where to write the result; stdout when omitted
    #[arg(short, long, help = "Path to the output file (defaults to stdout)")]
    output: Option<PathBuf>,

    /// Mode of operation (analyze or encrypt)
    #[arg(short, long, value_enum, default_value_t = OperationMode::Analyze)]
    mode: OperationMode,

    /// TOML language definition; Portuguese is used when omitted
    #[arg(short, long, help = "Path to a TOML language definition")]
    language: Option<PathBuf>,

    /// Assumed plaintext letter per column, e.g. "ASA"; prompts when omitted
    #[arg(short, long, help = "Rank assignment, one letter per column")]
    ranks: Option<String>,

    /// Skip the key length search and use this length
    #[arg(short, long, help = "Known key length")]
    key_length: Option<usize>,

    /// Largest key length the search tries
    #[arg(long, help = "Largest key length to try")]
    max_key_length: Option<usize>,

    /// Accepted distance from the language's index of coincidence
    #[arg(long, default_value_t = DEFAULT_TOLERANCE)]
    tolerance: f64,

    /// Letters the interactive prompt combines into hypotheses
    #[arg(long, default_value_t = DEFAULT_CANDIDATES.iter().collect::<String>())]
    candidates: String,

    /// Comma separated rank shifts used in encrypt mode, e.g. "2,5,1"
    #[arg(short, long, value_delimiter = ',')]
    shifts: Vec<usize>,

    /// Show debug output
    #[arg(short, long)]
    verbose: bool,
}

/// Enum representing the mode of operation.
#[derive(Clone, Debug, ValueEnum)]
enum OperationMode {
    /// Recover the plaintext of a ciphertext
    Analyze,
    /// Encrypt a plaintext with known rank shifts
    Encrypt,
}

fn main() -> Result<()> {
    let cli: Cli = Cli::parse();
    init_logging(cli.verbose);

    let result = run(&cli)?;
    write_result(cli.output.as_ref(), &result)
}

/// Reads the input file and produces the plaintext (analyze) or ciphertext (encrypt).
fn run(cli: &Cli) -> Result<String> {
    let language = match &cli.language {
        Some(path) => Language::from_file(path)?,
        None => Language::portuguese(),
    };
    debug!(language = %language.name, letters = language.alphabet.len(), "language loaded");

    let input: String = std::fs::read_to_string(&cli.file)
        .with_context(|| format!("Failed to read input file {}", cli.file.display()))?;
    let text = Alphabet::normalize(&input);

    if text.chars().count() < 50 {
        warn!("Text may be too short for reliable analysis");
    }

    let result = match cli.mode {
        OperationMode::Analyze => analyze(cli, &language, &text)?,
        OperationMode::Encrypt => {
            if cli.shifts.is_empty() {
                bail!("Encrypt mode needs --shifts");
            }
            encipher(&text, &cli.shifts, &language.frequencies)?
        }
    };

    Ok(result)
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

/// Runs the analysis pipeline and returns the recovered plaintext.
fn analyze(cli: &Cli, language: &Language, cipher: &str) -> Result<String> {
    let config = AnalysisConfig::new(cli.tolerance, cli.max_key_length)?;
    let mut analysis = Cryptanalysis::new(language, config, cipher);

    match cli.key_length {
        Some(key_length) => analysis.assume_key_length(key_length)?,
        None => {
            analysis
                .find_key_length()
                .context("Could not determine the key length")?;
        }
    }

    let most_frequent: String = analysis.analyze_columns()?.iter().collect();
    eprintln!("{}", style("Most frequent characters:").green().bold().underlined());
    eprintln!("{}", style(format!("[ {} ]", most_frequent)).blue().bold());

    let mut source: Box<dyn RankSource + '_> = match &cli.ranks {
        Some(ranks) => Box::new(FixedAssignment::parse(ranks)),
        None => Box::new(PromptSource::new(
            io::stdin().lock(),
            io::stderr(),
            cli.candidates.chars().flat_map(char::to_uppercase).collect(),
            &language.frequencies,
        )),
    };

    analysis.assign_ranks(source.as_mut())?;
    analysis.decode()?;
    let recovery = analysis.reconstruct()?;

    eprintln!(
        "{} {}",
        style(format!("Parsing [{}] with", most_frequent)).blue().bold(),
        style(format!("[{}]", recovery.assignment.iter().collect::<String>()))
            .green()
            .bold()
    );
    info!(key_length = recovery.key_length, shifts = ?recovery.shifts, "plaintext recovered");

    Ok(recovery.plaintext)
}

fn write_result(output: Option<&PathBuf>, result: &str) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, result)
                .with_context(|| format!("Failed to write output file {}", path.display()))?;
            info!("Output saved to: {}", path.display());
        }
        None => {
            let mut stdout = BufWriter::new(io::stdout().lock());
            writeln!(stdout, "{}", result)?;
            stdout.flush()?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use polyalpha_analysis::AnalysisError;
    use tempfile::TempDir;

    const PLAINTEXT: &str = "ALINGUAPORTUGUESAEUMADASMAISFALADASDOMUNDOEPOSSUIUMAHISTORIARICA\
        QUECOMECANAPENINSULAIBERICADURANTEAIDADEMEDIAQUANDOOLATIMFALADOPELOSPOVOSDAREGIAO\
        SETRANSFORMOULENTAMENTEEMDIVERSOSDIALETOSCOMOPASSARDOSSECULOSOPORTUGUESGANHOUFORMAP";

    fn write_input(dir: &TempDir, contents: &str) -> String {
        let path = dir.path().join("input.txt");
        std::fs::write(&path, contents).unwrap();
        path.to_str().unwrap().to_string()
    }

    fn cli(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("vigenere_decrypter").chain(args.iter().copied()))
            .unwrap()
    }

    /// Ciphertext of PLAINTEXT under shifts [2, 5, 1], lowercased and wrapped
    fn scrambled_cipher() -> String {
        let language = Language::portuguese();
        let cipher = encipher(PLAINTEXT, &[2, 5, 1], &language.frequencies).unwrap();

        cipher
            .to_lowercase()
            .as_bytes()
            .chunks(40)
            .map(|line| String::from_utf8_lossy(line).into_owned())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_analyze_with_ranks() {
        let dir = TempDir::new().unwrap();
        let file = write_input(&dir, &scrambled_cipher());

        let plaintext = run(&cli(&["-f", &file, "-r", "ASA"])).unwrap();
        assert_eq!(plaintext, PLAINTEXT);
    }

    #[test]
    fn test_analyze_with_known_key_length() {
        let dir = TempDir::new().unwrap();
        let file = write_input(&dir, &scrambled_cipher());

        let plaintext = run(&cli(&["-f", &file, "-k", "3", "-r", "a,s,a"])).unwrap();
        assert_eq!(plaintext, PLAINTEXT);
    }

    #[test]
    fn test_huge_max_key_length_is_accepted() {
        let dir = TempDir::new().unwrap();
        let file = write_input(&dir, &scrambled_cipher());
        let max = usize::MAX.to_string();

        let plaintext = run(&cli(&["-f", &file, "--max-key-length", &max, "-r", "ASA"])).unwrap();
        assert_eq!(plaintext, PLAINTEXT);
    }

    #[test]
    fn test_key_length_not_found() {
        let dir = TempDir::new().unwrap();
        let cycling: String = Language::portuguese()
            .alphabet
            .letters()
            .iter()
            .cycle()
            .take(23 * 4)
            .collect();
        let file = write_input(&dir, &cycling);

        let error = run(&cli(&["-f", &file, "-r", "ASA"])).unwrap_err();
        assert!(error.to_string().contains("Could not determine the key length"));
        assert!(matches!(
            error.downcast_ref::<AnalysisError>(),
            Some(AnalysisError::KeyLengthNotFound { max_tested: 23 })
        ));
    }

    #[test]
    fn test_invalid_tolerance() {
        let dir = TempDir::new().unwrap();
        let file = write_input(&dir, &scrambled_cipher());

        let error = run(&cli(&["-f", &file, "--tolerance=-0.5", "-r", "ASA"])).unwrap_err();
        assert_eq!(
            error.downcast_ref::<AnalysisError>(),
            Some(&AnalysisError::InvalidTolerance(-0.5))
        );
    }

    #[test]
    fn test_encrypt_needs_shifts() {
        let dir = TempDir::new().unwrap();
        let file = write_input(&dir, "aeae");

        let error = run(&cli(&["-f", &file, "-m", "encrypt"])).unwrap_err();
        assert!(error.to_string().contains("--shifts"));
    }

    #[test]
    fn test_encrypt_normalizes_input() {
        let dir = TempDir::new().unwrap();
        let file = write_input(&dir, "ae\nae ");

        let cipher = run(&cli(&["-f", &file, "-m", "encrypt", "-s", "2,5"])).unwrap();
        assert_eq!(cipher, "ONON");
    }

    #[test]
    fn test_missing_input_file() {
        let error = run(&cli(&["-f", "/nonexistent/cipher.txt", "-r", "A"])).unwrap_err();
        assert!(error.to_string().contains("Failed to read input file"));
    }

    #[test]
    fn test_write_result_to_file() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("plain.txt");

        write_result(Some(&output), PLAINTEXT).unwrap();
        assert_eq!(std::fs::read_to_string(&output).unwrap(), PLAINTEXT);
    }
}
