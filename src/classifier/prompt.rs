pub const SYSTEM_PROMPT: &str = "You are an expert technical support classifier. \
Analyze errors and route them to the appropriate department.";

const RESPONSE_SHAPE: &str = r#"
Based on this information, please provide a JSON response with the following structure:
{
    "department": "one of: backend, frontend, database, devops, security, api, integration, general",
    "severity": "one of: low, medium, high, critical",
    "confidence": "float between 0.0 and 1.0",
    "reasoning": "explanation of your classification decision",
    "suggested_actions": ["list", "of", "suggested", "actions"]
}

Consider these classification guidelines:
- Backend: Server-side logic, business logic errors, internal API issues
- Frontend: UI/UX issues, client-side JavaScript errors, rendering problems
- Database: Data storage, query issues, connection problems
- DevOps: Deployment, infrastructure, CI/CD, environment issues
- Security: Authentication, authorization, data privacy, vulnerability issues
- API: External API integration, endpoint errors, data format issues
- Integration: Third-party service integration, workflow automation issues
- General: Unclear issues or those spanning multiple departments

Severity levels:
- Critical: System down, data loss, security breach
- High: Major functionality broken, affecting many users
- Medium: Moderate impact, workarounds available
- Low: Minor issues, cosmetic problems
"#;

pub fn build_classification_prompt(
    description: &str,
    error_message: Option<&str>,
    context: Option<&str>,
) -> String {
    let mut prompt = format!(
        "Please analyze the following error and classify it for routing to the appropriate department.\n\nError Description: {description}\n"
    );

    if let Some(message) = error_message.filter(|m| !m.trim().is_empty()) {
        prompt.push_str(&format!("\nError Message: {message}"));
    }
    if let Some(context) = context.filter(|c| !c.trim().is_empty()) {
        prompt.push_str(&format!("\nContext: {context}"));
    }

    prompt.push('\n');
    prompt.push_str(RESPONSE_SHAPE);
    prompt
}
