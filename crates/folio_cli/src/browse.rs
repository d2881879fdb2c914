use chrono::Utc;
use folio_core::{ArticleId, Result};
use folio_views::{App, DetailView, Field};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines, Stdin};

const HELP: &str = "\
Commands:
  list            show the article list
  open <n>        read the n-th article of the list
  id <id>         read the article with this id
  new             write a new article
  refresh         reload everything from the store
  help            this text
  quit            leave";

#[derive(Debug, PartialEq, Eq)]
pub enum Command {
    List,
    Open(usize),
    Id(ArticleId),
    New,
    Refresh,
    Help,
    Quit,
}

impl Command {
    pub fn parse(line: &str) -> std::result::Result<Self, String> {
        let mut words = line.split_whitespace();
        let command = words.next().unwrap_or("list");
        let arg = words.next();
        match (command, arg) {
            ("list" | "l", _) => Ok(Self::List),
            ("open" | "o", Some(n)) => match n.parse::<usize>() {
                Ok(n) if n > 0 => Ok(Self::Open(n)),
                _ => Err(format!("Not a list position: {}", n)),
            },
            ("id", Some(id)) => id
                .parse()
                .map(Self::Id)
                .map_err(|_| format!("Not an article id: {}", id)),
            ("new" | "n", _) => Ok(Self::New),
            ("refresh" | "r", _) => Ok(Self::Refresh),
            ("help" | "h" | "?", _) => Ok(Self::Help),
            ("quit" | "q" | "exit", _) => Ok(Self::Quit),
            ("open" | "o" | "id", None) => Err(format!("`{}` needs an argument", command)),
            (other, _) => Err(format!("Unknown command: {} (try `help`)", other)),
        }
    }
}

async fn prompt(lines: &mut Lines<BufReader<Stdin>>, label: &str) -> Result<Option<String>> {
    let mut stdout = tokio::io::stdout();
    stdout.write_all(label.as_bytes()).await?;
    stdout.flush().await?;
    Ok(lines.next_line().await?)
}

fn flush_notifications(app: &mut App) {
    let painter = app.painter();
    for notification in app.drain_notifications() {
        eprintln!("{}", notification.render(&painter));
    }
}

async fn write_article(app: &mut App, lines: &mut Lines<BufReader<Stdin>>) -> Result<()> {
    app.open_form();
    println!("{}", app.form().render(&app.painter()));
    for field in Field::ALL {
        let marker = if field.is_required() { " *" } else { "" };
        let label = format!("{}{} ({}): ", field.label(), marker, field.hint());
        match prompt(lines, &label).await? {
            Some(value) => app.set_field(field, value),
            None => {
                app.close_form();
                return Ok(());
            }
        }
    }

    println!("{}", app.form().submit_label());
    if let Some(article) = app.submit_form(Utc::now()).await {
        app.select(article.id);
    }
    flush_notifications(app);
    Ok(())
}

/// Print what is on hand first, then the screen once the store has answered.
async fn show_screen(app: &mut App) {
    if let Some(pending) = app.render_pending().await {
        println!("{}", pending);
    }
    println!("{}", app.render().await);
}

async fn show_detail(app: &App) {
    let painter = app.painter();
    if let Some(pending) = app.pending_detail().await {
        println!("{}", DetailView::render(&pending, &painter));
    }
    println!("{}", DetailView::render(&app.detail().await, &painter));
}

/// Interactive session over one [`App`]; the query cache lives as long as it does.
pub async fn run(mut app: App) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    show_screen(&mut app).await;
    println!("\n{}", HELP);

    loop {
        let Some(line) = prompt(&mut lines, "\nfolio> ").await? else {
            break;
        };
        let command = match Command::parse(&line) {
            Ok(command) => command,
            Err(message) => {
                eprintln!("{}", app.painter().error(&message));
                continue;
            }
        };

        match command {
            Command::List => show_screen(&mut app).await,
            Command::Open(n) => {
                if app.select_position(n - 1).is_none() {
                    eprintln!("{}", app.painter().error(&format!("No article at position {}", n)));
                    continue;
                }
                show_detail(&app).await;
            }
            Command::Id(id) => {
                app.select(id);
                show_detail(&app).await;
            }
            Command::New => {
                write_article(&mut app, &mut lines).await?;
                show_screen(&mut app).await;
            }
            Command::Refresh => {
                let count = app.refresh().await;
                tracing::debug!("Refreshing {} queries", count);
                show_screen(&mut app).await;
            }
            Command::Help => println!("{}", HELP),
            Command::Quit => break,
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        assert_eq!(Command::parse(""), Ok(Command::List));
        assert_eq!(Command::parse("open 2"), Ok(Command::Open(2)));
        assert_eq!(Command::parse("id 7"), Ok(Command::Id(ArticleId(7))));
        assert_eq!(Command::parse("q"), Ok(Command::Quit));
        assert!(Command::parse("open 0").is_err());
        assert!(Command::parse("open").is_err());
        assert!(Command::parse("delete 3").is_err());
    }
}
