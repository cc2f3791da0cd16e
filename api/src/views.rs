// HTML pages. Every stored value passes through `escape` before output.
use domain::Record;

fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn page(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{title}</title>\n<link rel=\"stylesheet\" href=\"/style.css\">\n</head>\n\
         <body>\n{body}</body>\n</html>\n"
    )
}

/// Empty submission form.
pub fn submission_form() -> String {
    page(
        "Recordbook",
        "<main class=\"form\">\n<h1>New record</h1>\n\
         <form method=\"post\" action=\"/submit\">\n\
         <label>Name <input type=\"text\" name=\"name\"></label>\n\
         <label>Message <input type=\"text\" name=\"message\"></label>\n\
         <button type=\"submit\">Submit</button>\n</form>\n</main>\n",
    )
}

/// Table of every record with per-row and bulk delete buttons.
pub fn dashboard(records: &[Record]) -> String {
    let mut rows = String::new();
    for record in records {
        let id = escape(record.id().as_str());
        rows.push_str(&format!(
            "<tr><td>{id}</td><td>{}</td><td>{}</td>\
             <td><form method=\"post\" action=\"/delete/{id}\"><button type=\"submit\">Delete</button></form></td></tr>\n",
            escape(record.name()),
            escape(record.message()),
        ));
    }
    if records.is_empty() {
        rows.push_str("<tr><td colspan=\"4\">No records.</td></tr>\n");
    }

    let body = format!(
        "<main class=\"dashboard\">\n<h1>Records ({count})</h1>\n\
         <form method=\"post\" action=\"/delete-all\"><button type=\"submit\">Delete all</button></form>\n\
         <table>\n<thead><tr><th>ID</th><th>Name</th><th>Message</th><th></th></tr></thead>\n\
         <tbody>\n{rows}</tbody>\n</table>\n</main>\n",
        count = records.len(),
    );
    page("Dashboard", &body)
}
