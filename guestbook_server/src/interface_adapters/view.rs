use std::fmt::{self, Write};

use crate::domain::entities::Greeting;

// View model for one guestbook entry.
#[derive(Debug, PartialEq, Eq)]
pub struct GreetingView {
    // None renders the anonymous branch.
    pub author: Option<String>,
    pub content: String,
}

// View model for the guestbook page.
#[derive(Debug, PartialEq, Eq)]
pub struct GuestbookView {
    pub greetings: Vec<GreetingView>,
    pub sign_action: &'static str,
}

impl GuestbookView {
    pub fn from_greetings(greetings: &[Greeting]) -> Self {
        Self {
            greetings: greetings
                .iter()
                .map(|greeting| GreetingView {
                    author: (!greeting.author.is_empty()).then(|| greeting.author.clone()),
                    content: greeting.content.clone(),
                })
                .collect(),
            sign_action: "/sign",
        }
    }
}

// Renders the guestbook page. All interpolated text is HTML-escaped.
pub fn render_guestbook(view: &GuestbookView) -> Result<String, fmt::Error> {
    let mut html = String::with_capacity(256 + view.greetings.len() * 64);

    writeln!(html, "<html>")?;
    writeln!(html, "  <body>")?;
    for greeting in &view.greetings {
        match &greeting.author {
            Some(author) => writeln!(html, "    <p><b>{}</b> wrote:</p>", Escaped(author))?,
            None => writeln!(html, "    <p>An anonymous person wrote:</p>")?,
        }
        writeln!(html, "    <pre>{}</pre>", Escaped(&greeting.content))?;
    }
    writeln!(
        html,
        "    <form action=\"{}\" method=\"post\">",
        Escaped(view.sign_action)
    )?;
    writeln!(
        html,
        "      <div><textarea name=\"content\" rows=\"3\" cols=\"60\"></textarea></div>"
    )?;
    writeln!(
        html,
        "      <div><input type=\"submit\" value=\"Sign Guestbook\"></div>"
    )?;
    writeln!(html, "    </form>")?;
    writeln!(html, "  </body>")?;
    writeln!(html, "</html>")?;

    Ok(html)
}

struct Escaped<'a>(&'a str);

impl fmt::Display for Escaped<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut rest = self.0;
        while let Some(index) = rest.find(['&', '<', '>', '"', '\'', '\0']) {
            f.write_str(&rest[..index])?;
            let entity = match rest.as_bytes()[index] {
                b'&' => "&amp;",
                b'<' => "&lt;",
                b'>' => "&gt;",
                b'"' => "&#34;",
                b'\'' => "&#39;",
                _ => "\u{FFFD}",
            };
            f.write_str(entity)?;
            rest = &rest[index + 1..];
        }
        f.write_str(rest)
    }
}
