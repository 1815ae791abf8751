//! Server-rendered landing page with the questionnaire form

use crate::questions::Question;

const PAGE_HEAD: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>AQ-10 Autism Screening</title>
</head>
<body>
<main>
<h1>AQ-10 Autism Screening</h1>
<p>Answer each statement, then fill in the details below. This is a screening aid, not a diagnosis.</p>
<form id="aq10-form">
"#;

const PAGE_DETAILS: &str = r#"<fieldset>
<legend>About you</legend>
<label>Age <input name="age" type="number" min="1" max="120" required></label>
<label>Gender <select name="gender"><option value="m">Male</option><option value="f">Female</option></select></label>
<label>Ethnicity <input name="ethnicity" type="text" required></label>
<label>Born with jaundice <select name="jaundice"><option value="no">No</option><option value="yes">Yes</option></select></label>
<label>Family member with autism <select name="austim"><option value="no">No</option><option value="yes">Yes</option></select></label>
<label>Country of residence <input name="contry_of_res" type="text" required></label>
<label>Used a screening app before <select name="used_app_before"><option value="no">No</option><option value="yes">Yes</option></select></label>
<label>Who is completing the test <select name="relation"><option value="Self">Self</option><option value="Parent">Parent</option><option value="Relative">Relative</option><option value="Health care professional">Health care professional</option><option value="Others">Others</option></select></label>
</fieldset>
<button type="submit">Get screening result</button>
</form>
<pre id="result"></pre>
</main>
<script>
document.getElementById("aq10-form").addEventListener("submit", async (event) => {
  event.preventDefault();
  const body = {};
  for (const [key, value] of new FormData(event.target)) {
    body[key] = key.endsWith("_Score") || key === "age" ? Number(value) : value;
  }
  const response = await fetch("/api/predict", {
    method: "POST",
    headers: { "Content-Type": "application/json" },
    body: JSON.stringify(body),
  });
  document.getElementById("result").textContent = JSON.stringify(await response.json(), null, 2);
});
</script>
</body>
</html>
"#;

/// Minimal HTML escaping for text and attribute content
fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

fn render_question(number: usize, q: &Question) -> String {
    let id = escape(q.id);
    format!(
        r#"<fieldset class="question">
<legend>{number}. {question}</legend>
<p>{description}</p>
<label><input type="radio" name="{id}" value="1" required> Agree</label>
<label><input type="radio" name="{id}" value="0"> Disagree</label>
</fieldset>
"#,
        question = escape(q.question),
        description = escape(q.description),
    )
}

/// Render the index page for the given questionnaire
pub fn render_index(questions: &[Question]) -> String {
    let mut html = String::from(PAGE_HEAD);
    for (idx, q) in questions.iter().enumerate() {
        html.push_str(&render_question(idx + 1, q));
    }
    html.push_str(PAGE_DETAILS);
    html
}
