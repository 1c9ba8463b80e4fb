//! Structured résumé data: the record every scorer reads.
//!
//! Model output is untrusted, so deserialisation is forgiving: `null` lists become
//! empty, a lone string becomes a one-element list, numbers in text fields become text.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

pub mod extractor;
pub mod prompts;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersonalInfo {
    #[serde(deserialize_with = "lenient_string")]
    pub name: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub contact: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub email: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Education {
    #[serde(deserialize_with = "lenient_string")]
    pub school: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub major: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub degree: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub graduation_year: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkExperience {
    #[serde(deserialize_with = "lenient_string")]
    pub company: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub position: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub duration: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Project {
    #[serde(deserialize_with = "lenient_string")]
    pub name: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub description: Option<String>,
    #[serde(deserialize_with = "string_list")]
    pub technologies: Vec<String>,
}

/// Structured candidate information built from one source text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResumeRecord {
    #[serde(deserialize_with = "null_as_default")]
    pub personal_info: PersonalInfo,
    #[serde(deserialize_with = "object_list")]
    pub education: Vec<Education>,
    #[serde(deserialize_with = "object_list")]
    pub work_experience: Vec<WorkExperience>,
    #[serde(deserialize_with = "string_list")]
    pub skills: Vec<String>,
    #[serde(deserialize_with = "object_list")]
    pub projects: Vec<Project>,
    #[serde(deserialize_with = "string_list")]
    pub certificates: Vec<String>,
    pub raw_text: String,
    pub keywords: Vec<String>,
    pub text_length: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
}

fn text_of(s: &Option<String>) -> &str {
    s.as_deref().unwrap_or("")
}

impl WorkExperience {
    /// `position description`, the text relevance is measured against.
    pub fn summary_text(&self) -> String {
        format!("{} {}", text_of(&self.position), text_of(&self.description))
    }
}

impl Education {
    pub fn major_text(&self) -> String {
        format!("{} {}", text_of(&self.major), text_of(&self.degree))
    }
}

impl ResumeRecord {
    /// Raw text, skills, work entries and projects joined with single spaces.
    pub fn composite_text(&self) -> String {
        let mut parts = vec![self.raw_text.clone()];
        if !self.skills.is_empty() {
            parts.push(self.skills.join(" "));
        }
        parts.extend(self.work_experience.iter().map(WorkExperience::summary_text));
        parts.extend(
            self.projects
                .iter()
                .map(|p| format!("{} {}", text_of(&p.name), text_of(&p.description))),
        );
        parts.join(" ")
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn scalar_to_string(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(scalar_to_string(Value::deserialize(deserializer)?))
}

fn string_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => items.into_iter().filter_map(scalar_to_string).collect(),
        other => scalar_to_string(other).into_iter().collect(),
    })
}

/// Accepts `null`, a single object or an array; entries that are not objects are skipped.
fn object_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: serde::de::DeserializeOwned,
{
    let items = match Value::deserialize(deserializer)? {
        Value::Array(items) => items,
        obj @ Value::Object(_) => vec![obj],
        _ => Vec::new(),
    };
    Ok(items
        .into_iter()
        .filter(Value::is_object)
        .filter_map(|item| serde_json::from_value(item).ok())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_record_deserializes() {
        let json = r#"{
            "personal_info": {"name": "李雷", "contact": "13800000000", "email": "lilei@example.com"},
            "education": [{"school": "清华大学", "major": "计算机", "degree": "硕士", "graduation_year": 2020}],
            "work_experience": [{"company": "Acme", "position": "Backend Engineer", "duration": "2020-2023", "description": "Built APIs in Python"}],
            "skills": ["Python", "Docker"],
            "projects": [{"name": "Crawler", "description": "Distributed crawler", "technologies": ["Rust"]}],
            "certificates": ["CET-6"]
        }"#;
        let record: ResumeRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.personal_info.name.as_deref(), Some("李雷"));
        assert_eq!(record.education[0].graduation_year.as_deref(), Some("2020"));
        assert_eq!(record.work_experience.len(), 1);
        assert_eq!(record.skills, vec!["Python", "Docker"]);
        assert_eq!(record.projects[0].technologies, vec!["Rust"]);
        assert!(record.raw_text.is_empty());
    }

    #[test]
    fn test_nulls_and_missing_fields_become_empty() {
        let json = r#"{"personal_info": null, "education": null, "skills": null, "projects": [null, {"name": "X"}]}"#;
        let record: ResumeRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.personal_info, PersonalInfo::default());
        assert!(record.education.is_empty());
        assert!(record.work_experience.is_empty());
        assert!(record.skills.is_empty());
        assert_eq!(record.projects.len(), 1);
        assert!(record.certificates.is_empty());
    }

    #[test]
    fn test_single_string_skill_becomes_list() {
        let record: ResumeRecord = serde_json::from_str(r#"{"skills": "python"}"#).unwrap();
        assert_eq!(record.skills, vec!["python"]);
    }

    #[test]
    fn test_composite_text_order() {
        let record = ResumeRecord {
            raw_text: "RAW".to_string(),
            skills: vec!["python".to_string(), "react".to_string()],
            work_experience: vec![WorkExperience {
                position: Some("Engineer".to_string()),
                description: Some("APIs".to_string()),
                ..Default::default()
            }],
            projects: vec![Project {
                name: Some("Shop".to_string()),
                description: None,
                technologies: vec![],
            }],
            ..Default::default()
        };
        assert_eq!(record.composite_text(), "RAW python react Engineer APIs Shop ");
    }

    #[test]
    fn test_composite_text_without_skills() {
        let record = ResumeRecord {
            raw_text: "only text".to_string(),
            ..Default::default()
        };
        assert_eq!(record.composite_text(), "only text");
    }

    #[test]
    fn test_serialized_record_has_every_key() {
        let value = serde_json::to_value(ResumeRecord::default()).unwrap();
        for key in [
            "personal_info",
            "education",
            "work_experience",
            "skills",
            "projects",
            "certificates",
            "raw_text",
            "keywords",
            "text_length",
        ] {
            assert!(value.get(key).is_some(), "missing {key}");
        }
        assert!(value["personal_info"]["name"].is_null());
    }
}
