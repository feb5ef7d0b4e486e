// All LLM prompt constants for the pipeline graphs.
// Templates carry `{placeholder}` markers replaced before sending.

pub const VALIDATION_SYSTEM: &str = "You are a resume validation agent. \
    You analyze extracted text from a candidate document and produce a \
    structured validation report. Be strict but fair. Do not assume missing \
    information exists, and do not invent facts — state uncertainty clearly. \
    If the text appears garbled by parsing or OCR, mention 'possible parsing \
    issue'. You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences.";

pub const VALIDATION_PROMPT_TEMPLATE: &str = r#"Analyze the extracted text of a candidate document.

DOCUMENT METADATA:
- File name: {file_name}
- File type: {file_type}
- Target role (if provided): {target_role}

EXTRACTED TEXT:
{extracted_text}

EVALUATION CRITERIA — score each 0-5:

A) document_type_validity — does the text contain resume-like sections
   (contact information, work experience, education, skills)? A cover
   letter, biography, essay, invoice, certificate, or random notes is NOT a
   resume: set is_resume to false.
B) completeness — name, a contact method, experience entries with
   company/title/date, education, skills, enough detail to screen.
C) structure_readability — clear headings, reverse-chronological order,
   consistent dates, scannable bullets, low parser noise.
D) achievement_quality — responsibility-only bullets (weak), mixed (okay),
   or impact-focused with metrics (strong).
E) credibility_consistency — date overlaps or gaps, unrealistic claims,
   buzzword-heavy skills with no evidence, suspicious or missing contact
   info.
F) ats_friendliness — standard section names, machine-readable text, dates
   parseable, keyword relevance to the target role if one was given.

Return ONLY valid JSON with this exact shape:
{
  "is_resume": true,
  "scores": {
    "document_type_validity": 5,
    "completeness": 4,
    "structure_readability": 3,
    "achievement_quality": 4,
    "credibility_consistency": 5,
    "ats_friendliness": 3
  },
  "missing_fields": ["linkedin_url"],
  "top_issues": ["Issue 1", "Issue 2"],
  "suggested_improvements": ["Improvement 1", "Improvement 2"],
  "summary": "Brief overall assessment of the document."
}"#;

pub const QUALITY_SYSTEM: &str = "You are an expert resume reviewer producing \
    a detailed section-by-section quality report. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences.";

pub const QUALITY_PROMPT_TEMPLATE: &str = r#"Score the following resume section by section.

RESUME:
{resume_text}

For each section actually present (e.g. contact, summary, skills, experience,
education, projects, certifications), give a 0-10 score and one line of
feedback. Then give an overall 0-100 score weighted toward experience and
skills, the resume's main strengths, and concrete improvements.

Return ONLY valid JSON:
{
  "overall_score": 72,
  "section_scores": [
    {"section": "experience", "score": 7, "feedback": "Solid roles but few quantified outcomes."}
  ],
  "strengths": ["..."],
  "improvements": ["..."],
  "summary": "One-paragraph overall assessment."
}"#;

pub const SKILL_EXTRACT_SYSTEM: &str = "You extract skills from text. \
    Report only skills the text actually supports — never infer employers, \
    titles, or credentials. Normalize capitalization (pyspark -> PySpark, \
    k8s -> Kubernetes). You MUST respond with valid JSON only, no markdown \
    fences, no commentary.";

pub const RESUME_SKILLS_PROMPT_TEMPLATE: &str = r#"List every technical and professional skill this resume demonstrates, explicit or strongly implied.

RESUME:
{resume_text}

Return ONLY valid JSON:
{"skills": ["Skill 1", "Skill 2"]}"#;

pub const JD_SKILLS_PROMPT_TEMPLATE: &str = r#"List every skill this job description asks for, required or preferred.

JOB DESCRIPTION:
{jd_text}

Return ONLY valid JSON:
{"skills": ["Skill 1", "Skill 2"]}"#;

pub const SKILL_COMPARE_SYSTEM: &str = "You compare a candidate's skills \
    against a job's required skills. Treat synonyms and near-equivalent \
    tools as the same skill (e.g. 'Postgres' covers 'PostgreSQL', 'React.js' \
    covers 'React'). You MUST respond with valid JSON only, no markdown \
    fences, no commentary.";

pub const SKILL_COMPARE_PROMPT_TEMPLATE: &str = r#"Candidate skills:
{resume_skills}

Job skills:
{jd_skills}

TASK:
1. missing_skills: every job skill the candidate does not cover, after
   accounting for synonyms and near-equivalents. A job skill the candidate
   covers under a different name is NOT missing.
2. recommended: for each missing skill, one learning recommendation, ordered
   most important first.
3. match_score: 0-100, the share of job skills the candidate covers,
   weighted by how central each skill is to the role.

Return ONLY valid JSON:
{
  "missing_skills": ["..."],
  "recommended": [
    {"skill": "...", "reason": "..."}
  ],
  "match_score": 60
}"#;

pub const SCREENING_SYSTEM: &str = "You are an expert technical recruiter \
    evaluating candidate-job fit. You MUST respond with valid JSON only, \
    no markdown fences, no commentary.";

pub const SCREENING_PROMPT_TEMPLATE: &str = r#"Evaluate how well this candidate fits this job.

JOB DESCRIPTION:
{jd_text}

CANDIDATE RESUME:
{resume_text}

Score 0-100 based on skills, experience, and relevance, and explain the
score in two or three sentences, citing specifics from the resume.

Return ONLY valid JSON:
{
  "fit_score": 85,
  "rationale": "..."
}"#;

pub const PROFILE_GATE_SYSTEM: &str = "You decide whether a text describes a \
    person's professional background. You MUST respond with valid JSON \
    only, no markdown fences, no commentary.";

pub const PROFILE_GATE_PROMPT_TEMPLATE: &str = r#"Does the following text describe a person's professional background — their work, skills, education, or career — in enough detail to draft a resume from? Product descriptions, recipes, news articles, or other off-topic text do not qualify.

TEXT:
{profile_text}

Return ONLY valid JSON:
{"is_profile": true, "reason": "one sentence"}"#;

pub const GENERATE_SYSTEM: &str = "You are an expert resume writer. You turn \
    a profile description into a complete, professional resume. Leave out \
    any field the profile does not support — use JSON null or omit it, \
    never an empty placeholder string. You MUST respond with valid JSON \
    only, no markdown fences, no commentary.";

pub const GENERATE_PROMPT_TEMPLATE: &str = r#"Create a professional resume from this profile description.

PROFILE DESCRIPTION:
{profile_text}

Include contact information, a professional summary, key skills, work
experience with 2-4 achievement bullets per role, and education. Elaborate
on bullet points, but only with facts the profile supports.

Return ONLY valid JSON with this structure:
{
  "contact": {"name": "...", "email": "...", "phone": "...", "location": "...", "linkedin": "..."},
  "summary": "...",
  "skills": ["...", "..."],
  "experience": [
    {"title": "...", "company": "...", "period": "...", "bullets": ["...", "..."]}
  ],
  "education": [
    {"degree": "...", "school": "...", "year": "..."}
  ]
}"#;

pub const PROFILE_PARSE_SYSTEM: &str = "You extract structured resume data \
    from pasted or scraped profile text. The text may be partial or \
    garbled; extract what is there and leave everything else out. Copy \
    descriptions verbatim where possible and never invent dates, degrees, \
    or employers. You MUST respond with valid JSON only, no markdown \
    fences, no commentary.";

pub const PROFILE_PARSE_PROMPT_TEMPLATE: &str = r#"Extract structured resume data from this profile text. It may contain section delimiters like ===SECTION: EXPERIENCE===. Extract ALL entries from each section — do not truncate or summarize. Omit any section the text does not contain.

PROFILE:
{profile_text}

Return ONLY valid JSON:
{
  "name": "",
  "headline": "",
  "location": "",
  "summary": "",
  "experience": [
    {"title": "", "company": "", "period": "", "location": "", "description": ""}
  ],
  "skills": ["..."],
  "education": [
    {"degree": "", "school": "", "year": ""}
  ],
  "certifications": [
    {"name": "", "issuer": "", "date": ""}
  ]
}"#;

pub const PROFILE_WRITE_SYSTEM: &str = "You are a professional resume writer \
    converting parsed profile data into a structured resume. Include every \
    experience, education, and certification entry from the input — do not \
    truncate. Leave out any field the input does not support; never emit \
    empty placeholder strings. You MUST respond with valid JSON only, no \
    markdown fences, no commentary.";

pub const PROFILE_WRITE_PROMPT_TEMPLATE: &str = r#"Convert this parsed profile data into a resume.

PROFILE DATA:
{profile_json}

Write 2-4 achievement bullets per experience entry based on its description,
and a professional summary from the headline and overall profile.

Return ONLY valid JSON with this structure:
{
  "contact": {"name": "...", "email": "...", "phone": "...", "location": "..."},
  "summary": "...",
  "skills": ["...", "..."],
  "experience": [
    {"title": "...", "company": "...", "period": "...", "bullets": ["...", "..."]}
  ],
  "education": [
    {"degree": "...", "school": "...", "year": "..."}
  ],
  "certifications": [
    {"name": "...", "issuer": "...", "date": "..."}
  ]
}"#;
