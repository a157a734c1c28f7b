// Prompt templates for the two drafting stages.
// Replace `{work_description}` and `{one_sentence}` before sending.

/// Work-done stage: tasks already completed.
pub const WORK_DONE_PROMPT_TEMPLATE: &str = "Based on this work description: {work_description}, \
    generate a list of 2-3 concise tasks completed last week for a college internship report. \
    {one_sentence}";

/// Plans stage: tasks for the coming week.
pub const PLANS_PROMPT_TEMPLATE: &str = "Based on this work description: {work_description}, \
    generate a list of 2-3 concise tasks planned for next week for a college internship report. \
    {one_sentence}";
