/// Structured extraction prompt. Replace `{resume_text}` and `{json_only}` before sending.
pub const RESUME_EXTRACTION_PROMPT_TEMPLATE: &str = r#"Analyze the following résumé and extract its key information.

RÉSUMÉ:
{resume_text}

Extract:
1. Personal information: name, contact details, email
2. Education: school, major, degree, graduation year
3. Work experience: company, position, duration, description of responsibilities
4. Skills: professional skills, programming languages, tools
5. Projects: name, description, technology stack
6. Certificates and awards

Return a JSON object with this EXACT schema:
{
  "personal_info": {"name": "...", "contact": "...", "email": "..."},
  "education": [
    {"school": "...", "major": "...", "degree": "...", "graduation_year": "..."}
  ],
  "work_experience": [
    {"company": "...", "position": "...", "duration": "...", "description": "..."}
  ],
  "skills": ["skill 1", "skill 2"],
  "projects": [
    {"name": "...", "description": "...", "technologies": ["tech 1", "tech 2"]}
  ],
  "certificates": ["certificate 1"]
}

Keep names, degrees and majors in the language the résumé uses.
{json_only}"#;
