use std::{
    fs::{self, File},
    io::{self, BufWriter, Write},
    path::Path,
};

use anyhow::{Context, bail};
use mlsplit_engine::matrix::FeatureMatrix;

/// Write `value` as pretty JSON to `output_path`, or to stdout if `None`
pub fn save_json<T>(value: &T, output_path: Option<&Path>) -> anyhow::Result<()>
where
    T: serde::Serialize,
{
    let (mut writer, target): (Box<dyn Write>, String) = match output_path {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path.display()))?;
            (Box::new(BufWriter::new(file)), path.display().to_string())
        }
        None => (Box::new(io::stdout().lock()), "stdout".to_owned()),
    };

    serde_json::to_writer_pretty(&mut writer, value)
        .with_context(|| format!("Failed to write JSON to {target}"))?;
    writeln!(writer)
        .and_then(|()| writer.flush())
        .with_context(|| format!("Failed to flush output to {target}"))?;
    Ok(())
}

pub fn read_json_file<T, P>(file_kind: &str, path: P) -> anyhow::Result<T>
where
    T: serde::de::DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let file = File::open(path)
        .with_context(|| format!("Failed to open {} file: {}", file_kind, path.display()))?;

    let reader = io::BufReader::new(file);
    let value = serde_json::from_reader(reader).with_context(|| {
        format!(
            "Failed to parse {} JSON file: {}",
            file_kind,
            path.display()
        )
    })?;

    Ok(value)
}

/// Read a feature matrix from a whitespace-separated text file
///
/// See [`parse_matrix`] for the accepted layout.
pub fn read_matrix_file<P>(path: P) -> anyhow::Result<FeatureMatrix>
where
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read matrix file: {}", path.display()))?;
    parse_matrix(&text).with_context(|| format!("Invalid matrix file: {}", path.display()))
}

/// Parse a feature matrix, one feature per line
///
/// - Blank lines and lines starting with `#` are skipped
/// - A first line without any numeric value after its first column is a
///   header and is skipped
/// - A first column that is not a finite number is a row name and is ignored,
///   so genes named `nan` or `inf` are not read as values
pub fn parse_matrix(text: &str) -> anyhow::Result<FeatureMatrix> {
    let mut rows = vec![];
    let mut first = true;
    for (line_no, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let mut tokens = line.split_whitespace().peekable();
        let named = tokens
            .peek()
            .is_some_and(|token| !token.parse::<f64>().is_ok_and(f64::is_finite));
        if named {
            tokens.next();
        }
        let values = tokens.map(str::parse::<f64>).collect::<Vec<_>>();

        let is_header = first && values.iter().all(Result::is_err);
        first = false;
        if is_header {
            continue;
        }

        let row = values
            .into_iter()
            .collect::<Result<Vec<_>, _>>()
            .with_context(|| format!("line {}: non-numeric value", line_no + 1))?;
        rows.push(row);
    }
    if rows.is_empty() {
        bail!("no data rows");
    }
    Ok(FeatureMatrix::from_rows(rows)?)
}
