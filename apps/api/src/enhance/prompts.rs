// Prompt templates for the AI enhancement endpoints.
// Placeholders in `{braces}` are substituted by `fill` in a single pass before sending.

/// Shared closing rule for free-text rewrites.
const PLAIN_REPLY_RULE: &str = "Reply with the rewritten text only. \
    Do NOT add a preamble, explanation, headings, or quotation marks.";

pub const EXPERIENCE_TEMPLATE: &str = "You are a senior resume writer. \
Rewrite the job experience description below so it reads as impactful, professional and \
ATS-friendly. Open with strong action verbs, quantify achievements wherever the original \
supports it, and keep it concise.

{rule}

Original description:
{text}

Rewritten description:";

pub const SUMMARY_TEMPLATE: &str = "You are a senior resume writer. \
Rewrite the professional summary below as a compelling 2-3 sentence pitch that highlights the \
candidate's key strengths and stays ATS-friendly.

{rule}

Original summary:
{text}

Rewritten summary:";

pub const PROJECT_TEMPLATE: &str = "You are a senior resume writer. \
Rewrite the project description below to foreground the technical skills used, the impact, and \
concrete achievements. Keep it concise and professional.

{rule}

Original description:
{text}

Rewritten description:";

pub const SKILL_SUGGESTION_TEMPLATE: &str = r#"Suggest 10 technical and soft skills that would be valuable for someone working as "{job_title}".
The candidate already lists these skills: {current_skills}.

Return ONLY a JSON array of skill names, with no explanation. Example:
["Skill 1", "Skill 2", "Skill 3"]"#;

pub const JOB_MATCH_TEMPLATE: &str = r#"Assess how well a candidate fits the following job.

Job Title: {job_title}
Job Description: {job_description}

Candidate Skills: {user_skills}

Return ONLY a JSON object with this exact shape, no explanation:
{
  "matchScore": <integer 0-100>,
  "matchedSkills": ["skill1", "skill2"],
  "missingSkills": ["skill1", "skill2"],
  "recommendation": "one or two sentence recommendation"
}"#;

/// Substitutes `{key}` placeholders from `vars` in one left-to-right pass.
///
/// Inserted values are never rescanned, so braces inside user text stay literal. Braces that
/// do not name a known key (the JSON example in `JOB_MATCH_TEMPLATE`) are copied through.
pub fn fill(template: &str, vars: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let known = after.find('}').and_then(|close| {
            let key = &after[..close];
            vars.iter()
                .find(|(name, _)| *name == key)
                .map(|(_, value)| (*value, close))
        });
        match known {
            Some((value, close)) => {
                out.push_str(value);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }

    out.push_str(rest);
    out
}

/// A free-text rewrite prompt: the section template with the reply rule and `text` filled in.
pub fn rewrite_prompt(template: &str, text: &str) -> String {
    fill(template, &[("rule", PLAIN_REPLY_RULE), ("text", text)])
}

/// Comma-joined skill list, or `placeholder` when there are none.
pub fn join_skills(skills: &[String], placeholder: &str) -> String {
    if skills.is_empty() {
        placeholder.to_string()
    } else {
        skills.join(", ")
    }
}
