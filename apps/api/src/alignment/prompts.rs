// Prompt template for resume/JD alignment.

/// Placeholder replaced with the full extracted resume text.
pub const RESUME_SLOT: &str = "{resume_text}";
/// Placeholder replaced with the full job description text.
pub const JD_SLOT: &str = "{jd_text}";

/// Alignment prompt. Replace `{resume_text}` and `{jd_text}` before sending.
pub const ALIGNMENT_PROMPT_TEMPLATE: &str = r#"Resume Text: {resume_text}
 Job Description: {jd_text}
 Provide the exact modified sentences based on the job description, without mentioning the education background.
 Include a summary adding the required skills, write important notes, and provide suggestions.
 Provide 4 to 5 variations for each sentence in each section.
 *example: Variation 1: [First sentence].
- Variation 2: [Second sentence].
- Variation 3: [Third sentence].
- Variation 4: [Fourth sentence].
- Variation 5: [Fifth sentence].
 Keep the variations separate in each section and make other relevant changes to improve the resume's alignment with the JD. All the sentences should be segregated by section."#;
