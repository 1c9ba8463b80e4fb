/// Comprehensive assessment prompt. Replace `{job_title}`, `{job_description}`,
/// `{resume_text}` and `{json_only}` before sending.
pub const ASSESSMENT_PROMPT_TEMPLATE: &str = r#"You are an experienced recruiter and technical interviewer.
Assess how well the following candidate fits the target position.

TARGET POSITION: {job_title}

JOB DESCRIPTION:
{job_description}

CANDIDATE RÉSUMÉ:
{resume_text}

Score each dimension between 0 and 1:
1. technical_skills: match of technical skills
2. work_experience: relevance of work experience
3. project_experience: fit of project experience
4. learning_potential: ability to learn and grow
5. overall_score: overall suitability

Return a JSON object with this EXACT schema:
{
  "technical_skills": 0.8,
  "work_experience": 0.7,
  "project_experience": 0.6,
  "learning_potential": 0.8,
  "overall_score": 0.75,
  "strengths": ["strength 1", "strength 2"],
  "weaknesses": ["weakness 1", "weakness 2"],
  "summary": "one-paragraph assessment"
}

{json_only}"#;
