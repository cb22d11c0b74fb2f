use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, Write};
use std::time::Duration;

use crate::chat::{ChatMessage, Role};
use crate::export;
use crate::parse::ProductCopy;
use crate::workflow::{Recovery, Session, Status, Step};

const GUIDE: [(&str, &str); 6] = [
    (
        "Analyze Your Brand",
        "Enter your Shopify store URL. The AI reads your store content to understand your tone, style, and archetype.",
    ),
    (
        "Review Brand Profile",
        "A Brand Voice Profile is generated. Review it to make sure it represents your brand before moving on.",
    ),
    (
        "Analyze Product",
        "Provide a specific product URL. Key features, specs, and benefits are extracted to inform the copywriting.",
    ),
    (
        "Generate Optimized Copy",
        "Receive SEO-ready meta tags, keywords, and a persuasive product description written in your brand's voice.",
    ),
    (
        "Update Product Description",
        "In Shopify, open Products, select your item, and paste the generated text into the Description box.",
    ),
    (
        "Update Search Engine Listing",
        "Scroll to Search engine listing, click Edit, paste the new Meta Title and Description, then Save.",
    ),
];

pub fn print_guide() {
    println!("\n{}", "How It Works".bold());
    for (i, (title, body)) in GUIDE.iter().enumerate() {
        println!("{} {}", format!("{}.", i + 1).cyan().bold(), title.bold());
        println!("   {body}");
    }
    println!(
        "\n{} type {} at any prompt to ask the assistant about SEO strategy or if you get stuck.\n",
        "Pro tip:".cyan().bold(),
        "chat".bold()
    );
}

fn step_title(step: Step) -> &'static str {
    match step {
        Step::StoreUrlInput => "Analyze Your Brand",
        Step::BrandProfileDisplay => "Your Brand Voice Profile",
        Step::ProductUrlInput => "Analyze a Product",
        Step::ProductAnalysisDisplay => "Product Analysis",
        Step::ResultsDisplay => "Your Optimized Copy is Ready!",
    }
}

/// Prints markdown as-is except for emphasized heading lines.
pub fn print_markdown(text: &str) {
    for line in text.lines() {
        let trimmed = line.trim_start();
        if trimmed.starts_with('#') {
            let heading = trimmed.trim_start_matches('#').trim().replace("**", "");
            println!("{}", heading.cyan().bold());
        } else {
            println!("{line}");
        }
    }
}

pub fn show_results(copy: &ProductCopy) {
    for (title, content) in export::sections(copy) {
        println!("\n{}", title.bold().underline());
        if title == export::SECTION_TITLES[4] {
            print_markdown(content);
        } else {
            println!("{content}");
        }
    }
}

pub fn show_copy_all(copy: &ProductCopy) {
    println!("\n{}\n", "----- copy below this line -----".dimmed());
    println!("{}", export::render_plain_text(copy));
    println!("\n{}\n", "----- copy above this line -----".dimmed());
}

/// Renders the current step, including any error panel.
pub fn show_session(session: &Session) {
    println!("\n{}", format!("== {} ==", step_title(session.step)).bold());
    match session.step {
        Step::StoreUrlInput => {
            println!("Enter your Shopify store URL to capture its brand voice.");
        }
        Step::BrandProfileDisplay => print_markdown(&session.brand_profile),
        Step::ProductUrlInput => {
            println!("Brand voice locked in for {}.", session.store_url.green());
            println!("Enter the URL of the product you want to optimize.");
        }
        Step::ProductAnalysisDisplay => {
            println!("Product: {}", session.product_url.green());
            print_markdown(&session.product_analysis);
        }
        Step::ResultsDisplay => {
            if let Some(copy) = &session.product_copy {
                show_results(copy);
            }
        }
    }
    if let (Status::Failed(message), Some(recovery)) = (&session.status, session.recovery()) {
        show_error(message, recovery);
    }
}

pub fn show_error(message: &str, recovery: Recovery) {
    println!("\n{} {}", "An Error Occurred:".red().bold(), message);
    println!("Press Enter to {}.", recovery.label().bold());
}

/// Prints the key/label pairs of the options available at a step.
pub fn show_menu(options: &[(&str, &str)]) {
    let line = options
        .iter()
        .map(|(key, label)| format!("[{}] {}", key.bold(), label))
        .collect::<Vec<_>>()
        .join("   ");
    println!("\n{line}");
}

/// Reads one line from stdin. `None` on end of input.
pub fn prompt_line(prompt: &str) -> Option<String> {
    print!("{} ", prompt.bold());
    let _ = io::stdout().flush();
    let mut s = String::new();
    match io::stdin().read_line(&mut s) {
        Ok(0) | Err(_) => None,
        Ok(_) => Some(s.trim().to_string()),
    }
}

pub fn confirm(prompt: &str) -> bool {
    print!("{} [y/N]: ", prompt);
    let _ = io::stdout().flush();
    let mut s = String::new();
    if io::stdin().read_line(&mut s).is_ok() {
        let ans = s.trim().to_lowercase();
        ans == "y" || ans == "yes"
    } else {
        false
    }
}

/// Shows the session's loading message while a step runs.
pub struct Spinner {
    bar: ProgressBar,
}

impl Spinner {
    pub fn new() -> Self {
        let bar = ProgressBar::new_spinner();
        let style = ProgressStyle::with_template("{spinner:.cyan} {msg}").unwrap_or_else(|_| ProgressStyle::default_spinner());
        bar.set_style(style);
        Self { bar }
    }

    pub fn observe(&self, session: &Session) {
        if let Status::Loading(message) = &session.status {
            self.bar.enable_steady_tick(Duration::from_millis(100));
            self.bar.set_message(message.clone());
        }
    }

    pub fn finish(self) {
        self.bar.finish_and_clear();
    }
}

/// Streams a growing reply to the terminal, printing only what is new.
#[derive(Default)]
pub struct ReplyPrinter {
    printed: usize,
}

impl ReplyPrinter {
    fn fresh<'m>(&mut self, content: &'m str) -> &'m str {
        let new = content.get(self.printed..).unwrap_or("");
        self.printed = content.len();
        new
    }

    pub fn update(&mut self, message: &ChatMessage) {
        let new = self.fresh(&message.content);
        print!("{new}");
        let _ = io::stdout().flush();
    }
}

pub fn show_chat_intro(available: bool) {
    println!("\n{}", "AI Assistant".bold());
    if available {
        println!("Hello! How can I help you with your SEO or product descriptions today?");
    } else {
        println!("{}", "The assistant could not be started; messages will not be answered.".yellow());
    }
    println!("{}", "Type /back to return to the wizard.".dimmed());
}

pub fn show_chat_message(message: &ChatMessage) {
    match message.role {
        Role::User => println!("{} {}", "you:".green().bold(), message.content),
        Role::Model => println!("{} {}", "assistant:".cyan().bold(), message.content),
    }
}

pub fn chat_reply_prefix() {
    print!("{} ", "assistant:".cyan().bold());
    let _ = io::stdout().flush();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn printer_emits_only_new_text() {
        let mut p = ReplyPrinter::default();
        assert_eq!(p.fresh("Hel"), "Hel");
        assert_eq!(p.fresh("Hello"), "lo");
        assert_eq!(p.fresh("Hello"), "");
        assert_eq!(p.fresh("Hello\n\n*Error*"), "\n\n*Error*");
    }

    #[test]
    fn guide_has_six_steps() {
        assert_eq!(GUIDE.len(), 6);
        assert_eq!(GUIDE[0].0, "Analyze Your Brand");
    }
}
