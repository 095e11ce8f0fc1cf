//! Prompt templates for every completion the assistant makes.

pub fn router_prompt(question: &str) -> String {
    format!(
        r#"You are the dispatcher of a legal research assistant. Choose the route for the user's message.

1) Overview: general summaries, questions about which documents exist ("what do you have?", "what is this?"), greetings ("Hello"), or any request without a specific legal detail.
   If the intent is unclear, choose Overview.
2) DetailedAnalysis: a specific article ("Article 11", "Madde 11"), a legal definition, a scenario analysis, or a detailed regulatory question.

Return the route and a one-sentence reasoning.

Message: {question}
"#
    )
}

pub fn analyzer_prompt(question: &str, available_sources: &[String]) -> String {
    let sources = if available_sources.is_empty() {
        "(none indexed)".to_string()
    } else {
        available_sources.join(", ")
    };
    format!(
        r#"You are a legal information architect planning a document search.

Available sources (document names):
[{sources}]

1) strategy
   Point (find and fetch):
   - the question concerns one specific document
   - the official definition of a term
   - a specific number, duration or limit
   - plain factual requests such as "list", "count", "what is"
   Broad (explore and synthesize):
   - processes and procedures
   - obligations and general responsibilities
   - scenarios and example cases
   - comparisons

2) targetSource
   - If the question refers to one of the sources above (for example "in KVKK", "in the regulation"),
     copy that document name EXACTLY as listed.
   - Otherwise return null.

Question: {question}
"#
    )
}

pub fn responder_prompt(question: &str, context: &str, target_source: Option<&str>) -> String {
    let focus = match target_source {
        Some(s) => format!("Focused source: {s}"),
        None => "Source: entire database".to_string(),
    };
    format!(
        r#"You are a professional legal assistant. Answer the question using the context below.

{focus}

Context:
{context}

Question: {question}

Answer in precise legal language, cite the articles you rely on, and name the sources.
"#
    )
}

pub fn overview_prompt(question: &str, summaries: &str) -> String {
    format!(
        r#"You are a helpful legal assistant. The user asked for general information or a summary.
Below are prepared summaries of the relevant documents in the database.

Task:
Use these summaries to give a clear, well-organized answer.
If the user asked something general such as "what do you have?", list the documents and briefly describe each.

--- SUMMARIES ---
{summaries}
-----------------

Question: {question}

Answer:
"#
    )
}

pub fn document_summary_prompt(source: &str, text: &str) -> String {
    format!(
        r#"Analyze the legal text below and write a thorough summary.

Cover:
1) the PURPOSE of the document
2) the main subjects it covers
3) important DEFINITIONS or PENALTIES, if any
4) a clear itemized summary in the document's language

Document: {source}

Text (truncated):
{text}

Summary:
"#
    )
}
