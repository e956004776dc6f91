/// Default brochure filename for a company: non-alphanumerics become `_`, lowercased
pub fn brochure_filename(company_name: &str) -> String {
    let safe_name: String = company_name
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .collect();
    format!("{}_brochure.md", safe_name.to_lowercase())
}

/// Remove markdown code fences the model sometimes wraps its answer in
pub fn strip_code_fences(text: &str) -> String {
    text.replace("```markdown", "").replace("```", "")
}
