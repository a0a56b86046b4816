use crate::llm::Message;

pub const SYSTEM_PROMPT: &str = "You are a professional research assistant. Read the multi-source notes you are given and answer in a concise, well-structured format that is easy to scan. Never produce empty or placeholder bullet points: if a piece of information is unavailable, leave that bullet out instead of writing an empty one.";

const OUTPUT_TEMPLATE: &str = r#"Format your answer EXACTLY as follows (numbered section headers with a dot, dash bullets "- " for items):

1. Detailed Analysis
- A thorough, well-structured narrative that synthesizes the notes.
- Short paragraphs; subheadings only where they help.
- Name the sources inline where relevant (e.g. Reddit, Wikipedia, News).

2. Executive Summary
- 2 to 4 short bullets with the most important takeaways. No empty bullets.

3. Key Facts
- 5 to 10 concise bullets with numbers, dates and names where available. No empty bullets or placeholders.

4. Social Media Opinions
- Notable opinions and patterns from the social sources. No empty bullets.

5. Source Links
- One bullet per top link, written as "- Title - URL".

Rules:
- The Detailed Analysis comes BEFORE the Executive Summary.
- Never write an item such as "1)" or "-" with nothing after it.
- Leave out any bullet the notes cannot back up.
- Before returning, make a final pass that removes every empty list item."#;

/// The user turn: topic, the rendered notes, and the output template.
pub fn user_prompt(query: &str, corpus: &str) -> String {
    format!(
        "Research Topic: {query}\n\n\
         You are given cleaned notes from multiple sources (news, blogs, Reddit, Hacker News, Wikipedia, YouTube, linked pages).\n\
         Use ONLY the provided notes to answer. If the notes don't cover something, say so.\n\n\
         Notes:\n{corpus}\n\n\
         {OUTPUT_TEMPLATE}"
    )
}

pub fn messages(query: &str, corpus: &str) -> Vec<Message> {
    vec![Message::system(SYSTEM_PROMPT), Message::user(user_prompt(query, corpus))]
}
