use crate::utils::{brochure_filename, strip_code_fences};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Write markdown to `dir/filename` (UTF-8, overwriting), or to the default
/// brochure filename for `company_name` when no filename is given
pub fn save_brochure(
    dir: &Path,
    company_name: &str,
    filename: Option<&str>,
    content: &str,
) -> io::Result<PathBuf> {
    let filename = filename
        .map(str::to_string)
        .unwrap_or_else(|| brochure_filename(company_name));

    std::fs::create_dir_all(dir)?;
    let path = dir.join(filename);
    std::fs::write(&path, content)?;

    ::log::info!("Brochure saved to: {}", path.display());
    Ok(path)
}

/// Print a finished summary
pub fn print_summary(url: &str, summary: &str) {
    println!("\n--- Summary for: {} ---\n", url);
    println!("{}", summary);
    println!("\n---------------------------\n");
}

/// Print a finished brochure
pub fn print_brochure(brochure: &str) {
    println!("\n--- Generated Brochure (Markdown) ---");
    println!("{}", strip_code_fences(brochure));
    println!("-------------------------------------");
}

/// Print one streamed delta immediately, without code fences
pub fn print_delta(delta: &str) {
    let mut stdout = io::stdout().lock();
    let _ = stdout.write_all(strip_code_fences(delta).as_bytes());
    let _ = stdout.flush();
}
