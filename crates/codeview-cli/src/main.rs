use anyhow::{Context, Result};
use codeview_config::Config;
use codeview_engine::{
    ClipboardWriter, CodeBlockRenderer, CodeBlockView, CodeNode, ColorScheme, RenderError,
    RenderedBlock, StreamFeed, SyntectHighlighter, code_nodes,
};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::{
    env,
    io::{Stdout, stdout},
    path::PathBuf,
    process,
    time::Duration,
};

mod clipboard;
mod ui;

use clipboard::Osc52Clipboard;

pub struct App {
    source: String,
    feed: Option<StreamFeed>,
    renderer: CodeBlockRenderer<SyntectHighlighter>,
    nodes: Vec<CodeNode>,
    views: Vec<CodeBlockView>,
    selected: usize,
    scheme: ColorScheme,
    status: Option<String>,
}

impl App {
    fn new(source: String, config: &Config, scheme: ColorScheme, streaming: bool) -> Result<Self> {
        let theme = config.syntax_theme(scheme);
        let highlighter = match SyntectHighlighter::new(theme) {
            Ok(highlighter) => highlighter,
            Err(e) => {
                log::warn!("{e}, falling back to the bundled theme");
                SyntectHighlighter::for_scheme(scheme)?
            }
        };
        let stream = config.stream_state();
        let feed = streaming
            .then(|| StreamFeed::new(source.clone(), config.stream_chunk_size, &stream));
        let renderer = CodeBlockRenderer::new(highlighter).with_stream_state(stream);

        let mut app = Self {
            source,
            feed,
            renderer,
            nodes: Vec::new(),
            views: Vec::new(),
            selected: 0,
            scheme,
            status: None,
        };
        app.refresh_nodes();
        Ok(app)
    }

    fn refresh_nodes(&mut self) {
        self.nodes = match &self.feed {
            Some(feed) => feed.code_nodes(),
            None => code_nodes(&self.source),
        };
        // Blocks keep their view by position in the document
        while self.views.len() < self.nodes.len() {
            self.views.push(CodeBlockView::new());
        }
        self.views.truncate(self.nodes.len());
    }

    /// Advance the stream by one chunk. Returns false once it has ended.
    fn tick(&mut self) -> bool {
        let advanced = self.feed.as_mut().is_some_and(StreamFeed::advance);
        if advanced {
            self.refresh_nodes();
            if !self.is_streaming() {
                self.remount_views();
            }
        }
        advanced
    }

    fn finish_stream(&mut self) {
        let Some(feed) = self.feed.as_mut() else {
            return;
        };
        if feed.is_finished() {
            return;
        }
        feed.finish();
        self.refresh_nodes();
        self.remount_views();
    }

    /// Fresh elements for the finished text, so each block is highlighted once
    /// over its complete code instead of the first chunk it was seen with.
    fn remount_views(&mut self) {
        log::debug!("Stream finished, remounting {} code blocks", self.views.len());
        for view in &mut self.views {
            view.remount();
        }
    }

    fn render_blocks(&mut self) -> Result<Vec<RenderedBlock>, RenderError> {
        let renderer = &self.renderer;
        let scheme = self.scheme;
        self.views
            .iter_mut()
            .zip(&self.nodes)
            .map(|(view, node)| view.render(renderer, node, scheme).map(|(block, _)| block))
            .collect()
    }

    fn next_block(&mut self) {
        if !self.nodes.is_empty() {
            self.selected = (self.selected + 1) % self.nodes.len();
        }
    }

    fn previous_block(&mut self) {
        if !self.nodes.is_empty() {
            self.selected = self
                .selected
                .checked_sub(1)
                .unwrap_or(self.nodes.len() - 1);
        }
    }

    fn copy_selected<W: ClipboardWriter + ?Sized>(&mut self, clipboard: &W) {
        let renderer = &self.renderer;
        let scheme = self.scheme;
        let selected = self.selected;
        let rendered = match (self.views.get_mut(selected), self.nodes.get(selected)) {
            (Some(view), Some(node)) => view.render(renderer, node, scheme),
            _ => {
                self.status = Some("Nothing to copy".to_string());
                return;
            }
        };
        match rendered {
            Ok((block, _)) => {
                block.header.copy.activate(clipboard);
                self.status = Some(format!("Copied {} block", block.header.label));
            }
            Err(e) => self.status = Some(format!("Render failed: {e}")),
        }
    }

    fn toggle_scheme(&mut self) {
        self.scheme = self.scheme.toggled();
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn is_streaming(&self) -> bool {
        self.feed.as_ref().is_some_and(|feed| !feed.is_finished())
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }
}

struct Args {
    document: Option<PathBuf>,
    streaming: bool,
    dark_mode: Option<bool>,
    init_config: bool,
}

fn parse_args(args: &[String]) -> Result<Args, String> {
    let mut parsed = Args {
        document: None,
        streaming: false,
        dark_mode: None,
        init_config: false,
    };
    for arg in args.iter().skip(1) {
        match arg.as_str() {
            "--stream" => parsed.streaming = true,
            "--dark" => parsed.dark_mode = Some(true),
            "--light" => parsed.dark_mode = Some(false),
            "--init-config" => parsed.init_config = true,
            flag if flag.starts_with("--") => return Err(format!("Unknown option {flag}")),
            path if parsed.document.is_none() => parsed.document = Some(PathBuf::from(path)),
            _ => return Err("Only one document can be given".to_string()),
        }
    }
    Ok(parsed)
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Warn)
        .init();

    let args: Vec<String> = env::args().collect();
    let usage = format!(
        "Usage: {} [--stream] [--dark|--light] [--init-config] [markdown-file]",
        args[0]
    );
    let parsed = match parse_args(&args) {
        Ok(parsed) => parsed,
        Err(e) => {
            eprintln!("Error: {e}");
            eprintln!("{usage}");
            process::exit(1);
        }
    };

    if parsed.init_config {
        let config_path = Config::config_path();
        if config_path.exists() {
            eprintln!("Config file already exists at {}", config_path.display());
            process::exit(1);
        }
        Config::default()
            .save()
            .with_context(|| format!("Failed to write {}", config_path.display()))?;
        println!("Created default config file at {}", config_path.display());
        return Ok(());
    }

    let config = match Config::load_or_default() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: Failed to load config file: {e}");
            process::exit(1);
        }
    };

    // Document from CLI argument, then config file
    let Some(document) = parsed.document.or_else(|| config.default_document.clone()) else {
        eprintln!("Error: No markdown file provided and no default_document configured");
        eprintln!("{usage}");
        eprintln!("Or set default_document in {}", Config::config_path().display());
        process::exit(1);
    };
    let source = std::fs::read_to_string(&document)
        .with_context(|| format!("Failed to read {}", document.display()))?;

    let scheme = parsed
        .dark_mode
        .map(ColorScheme::from_dark_mode)
        .unwrap_or_else(|| config.color_scheme());
    let mut app = App::new(source, &config, scheme, parsed.streaming)?;
    let tick = Duration::from_millis(config.stream_tick_ms);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app, tick);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("{err:?}");
    }

    Ok(())
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &mut App,
    tick: Duration,
) -> Result<()> {
    let clipboard = Osc52Clipboard::stdout();
    loop {
        let blocks = app.render_blocks()?;
        terminal.draw(|f| ui::draw(f, &*app, &blocks))?;

        if !event::poll(tick)? {
            app.tick();
            continue;
        }
        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            match key.code {
                KeyCode::Char('q') => return Ok(()),
                KeyCode::Down | KeyCode::Char('j') => app.next_block(),
                KeyCode::Up | KeyCode::Char('k') => app.previous_block(),
                KeyCode::Char('c') => app.copy_selected(&clipboard),
                KeyCode::Char('t') => app.toggle_scheme(),
                KeyCode::Char('s') => app.finish_stream(),
                _ => {}
            }
        }
    }
}
