//! Resume document rows and the structured resume record produced by the
//! generation pipelines.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Summary view of a stored resume document, aggregated from its chunk rows.
#[derive(Debug, Clone, Serialize)]
pub struct ResumeDocument {
    pub id: Uuid,
    pub owner_id: String,
    pub filename: String,
    pub chunk_count: i64,
    pub created_at: DateTime<Utc>,
}

/// One search hit: a document with its aggregated similarity score and the
/// best-matching chunk as an excerpt.
#[derive(Debug, Clone, Serialize)]
pub struct ResumeMatch {
    pub resume_id: Uuid,
    pub filename: String,
    pub score: f32,
    pub excerpt: String,
}

/// Contact block of a generated resume. Every field is optional; a field the
/// model could not ground in the input stays absent so the export renderer
/// can tell "not provided" from "empty".
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Contact {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
}

impl Contact {
    fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.email.is_none()
            && self.phone.is_none()
            && self.location.is_none()
            && self.linkedin.is_none()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExperienceEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub period: Option<String>,
    #[serde(default)]
    pub bullets: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EducationEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub degree: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub school: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CertificationEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issuer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

/// Structured resume record handed to the export collaborator.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeneratedResume {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact: Option<Contact>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub experience: Vec<ExperienceEntry>,
    #[serde(default)]
    pub education: Vec<EducationEntry>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub certifications: Vec<CertificationEntry>,
}

fn prune_string(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

impl GeneratedResume {
    /// Normalizes model output for export: empty-string placeholders become
    /// absent fields, and entries with no content at all are dropped.
    pub fn pruned(self) -> Self {
        let contact = self.contact.map(|c| Contact {
            name: prune_string(c.name),
            email: prune_string(c.email),
            phone: prune_string(c.phone),
            location: prune_string(c.location),
            linkedin: prune_string(c.linkedin),
        });
        let contact = contact.filter(|c| !c.is_empty());

        let experience = self
            .experience
            .into_iter()
            .map(|e| ExperienceEntry {
                title: prune_string(e.title),
                company: prune_string(e.company),
                period: prune_string(e.period),
                bullets: e
                    .bullets
                    .into_iter()
                    .filter(|b| !b.trim().is_empty())
                    .collect(),
            })
            .filter(|e| e.title.is_some() || e.company.is_some() || !e.bullets.is_empty())
            .collect();

        let education = self
            .education
            .into_iter()
            .map(|e| EducationEntry {
                degree: prune_string(e.degree),
                school: prune_string(e.school),
                year: prune_string(e.year),
            })
            .filter(|e| e.degree.is_some() || e.school.is_some())
            .collect();

        let certifications = self
            .certifications
            .into_iter()
            .map(|c| CertificationEntry {
                name: prune_string(c.name),
                issuer: prune_string(c.issuer),
                date: prune_string(c.date),
            })
            .filter(|c| c.name.is_some())
            .collect();

        GeneratedResume {
            contact,
            summary: prune_string(self.summary),
            skills: self
                .skills
                .into_iter()
                .filter(|s| !s.trim().is_empty())
                .collect(),
            experience,
            education,
            certifications,
        }
    }

    /// Flattens the record back into plain text, in resume section order.
    /// Used to re-run the validation classifier over generated output.
    pub fn to_plain_text(&self) -> String {
        let mut out = String::new();
        if let Some(contact) = &self.contact {
            for value in [
                &contact.name,
                &contact.email,
                &contact.phone,
                &contact.location,
                &contact.linkedin,
            ]
            .into_iter()
            .flatten()
            {
                out.push_str(value);
                out.push('\n');
            }
        }
        if let Some(summary) = &self.summary {
            out.push_str("\nSummary\n");
            out.push_str(summary);
            out.push('\n');
        }
        if !self.skills.is_empty() {
            out.push_str("\nSkills\n");
            out.push_str(&self.skills.join(", "));
            out.push('\n');
        }
        if !self.experience.is_empty() {
            out.push_str("\nExperience\n");
            for entry in &self.experience {
                let header: Vec<&str> = [&entry.title, &entry.company, &entry.period]
                    .into_iter()
                    .flatten()
                    .map(String::as_str)
                    .collect();
                out.push_str(&header.join(" — "));
                out.push('\n');
                for bullet in &entry.bullets {
                    out.push_str("- ");
                    out.push_str(bullet);
                    out.push('\n');
                }
            }
        }
        if !self.education.is_empty() {
            out.push_str("\nEducation\n");
            for entry in &self.education {
                let line: Vec<&str> = [&entry.degree, &entry.school, &entry.year]
                    .into_iter()
                    .flatten()
                    .map(String::as_str)
                    .collect();
                out.push_str(&line.join(", "));
                out.push('\n');
            }
        }
        if !self.certifications.is_empty() {
            out.push_str("\nCertifications\n");
            for entry in &self.certifications {
                let line: Vec<&str> = [&entry.name, &entry.issuer, &entry.date]
                    .into_iter()
                    .flatten()
                    .map(String::as_str)
                    .collect();
                out.push_str(&line.join(", "));
                out.push('\n');
            }
        }
        out
    }
}
