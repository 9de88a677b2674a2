//! TUI read-line 演示
//!
//! 使用 crossterm 和 ratatui 构建的终端行编辑器,带历史漫游
//!
//! # 用法
//!
//! ```bash
//! cargo run -p tui-lineedit
//! ```
//!
//! # 快捷键
//!
//! - Up: 开始历史漫游(前缀 = 光标前的内容);漫游中走到上一条
//! - Down: 漫游中走到下一条
//! - Enter: 漫游中接受预览;否则提交当前行并写入历史
//! - Esc: 取消漫游,恢复原输入
//! - 其他按键: 漫游中先接受预览,再按普通编辑处理
//! - Backspace/Delete/方向键/Home/End: 编辑
//! - Ctrl+D: 退出

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use lineedit_core::render::{Cell, STYLE_MODE_LINE, STYLE_PENDING, STYLE_PROMPT, StyleId};
use lineedit_core::term;
use lineedit_core::{App, AppSpec};
use lineedit_history::histwalk::{self, Config};
use lineedit_history::{HistwalkError, MemStore, PrefixWalker};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};
use std::io::{self, stdout};
use std::sync::{Arc, Mutex};

struct Repl {
    app: App,
    store: MemStore,
    /// 最近一次内核通知,显示在状态行
    status: Arc<Mutex<String>>,
    /// 已提交的行(回显区)
    accepted: Vec<String>,
    should_quit: bool,
}

impl Repl {
    fn new() -> Self {
        let status = Arc::new(Mutex::new(String::new()));
        let sink = status.clone();
        let app = App::new(AppSpec {
            prompt: "~> ".to_string(),
            notify: Some(Box::new(move |msg| {
                if let Ok(mut status) = sink.lock() {
                    *status = msg.to_string();
                }
            })),
            ..Default::default()
        });

        // 预置一些历史,便于演示
        let mut store = MemStore::new();
        store.add_cmd("git status");
        store.add_cmd("ls -la");
        store.add_cmd("git commit -m 'init'");
        store.add_cmd("cargo build");
        store.add_cmd("git push");

        Self {
            app,
            store,
            status,
            accepted: Vec::new(),
            should_quit: false,
        }
    }

    fn set_status(&self, message: &str) {
        if let Ok(mut status) = self.status.lock() {
            *status = message.to_string();
        }
    }

    fn walking(&self) -> bool {
        self.app.copy_state().addon.is_some()
    }

    /// 以光标前的内容为前缀启动历史漫游
    fn start_walk(&self) {
        let state = self.app.codearea().copy_state();
        let prefix = state.buffer.content[..state.buffer.dot].to_string();
        let walker = PrefixWalker::new(self.store.cmds().to_vec(), prefix);

        let app = self.app.clone();
        let status = self.status.clone();
        let binding = move |event: &term::Event| match event {
            term::Event::Key(term::Key::Up) => {
                if let Err(HistwalkError::Walk(_)) = histwalk::prev(&app) {
                    if let Ok(mut status) = status.lock() {
                        *status = "end of history".to_string();
                    }
                }
                true
            }
            term::Event::Key(term::Key::Down) => {
                if let Err(HistwalkError::Walk(_)) = histwalk::next(&app) {
                    if let Ok(mut status) = status.lock() {
                        *status = "end of history".to_string();
                    }
                }
                true
            }
            term::Event::Key(term::Key::Enter) => {
                histwalk::accept(&app);
                true
            }
            term::Event::Key(term::Key::Esc) => {
                histwalk::close(&app);
                true
            }
            // 其他按键: 先接受预览,再交给默认编辑
            _ => {
                histwalk::accept(&app);
                false
            }
        };

        self.set_status("");
        histwalk::start(
            &self.app,
            Config {
                binding: Some(Box::new(binding)),
                walker: Some(Box::new(walker)),
            },
        );
    }

    /// 提交当前行: 写入历史并清空缓冲区
    fn submit_line(&mut self) {
        let state = self.app.codearea().copy_state();
        let line = state.buffer.content;
        if !line.trim().is_empty() {
            self.store.add_cmd(line.clone());
        }
        self.accepted.push(line);
        self.app.codearea().mutate(|s| *s = Default::default());
        self.set_status("");
    }

    fn handle_key_event(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('d') {
            self.should_quit = true;
            return;
        }

        let Some(event) = translate_key(key) else {
            return;
        };
        let walking = self.walking();
        match &event {
            term::Event::Key(term::Key::Up) if !walking => {
                self.start_walk();
                return;
            }
            term::Event::Key(term::Key::Enter) if !walking => {
                self.submit_line();
                return;
            }
            _ => {}
        }
        self.app.handle_event(&event);
    }

    fn handle_paste(&mut self, text: String) {
        self.app.handle_event(&term::Event::Paste(text));
    }

    /// 渲染 UI
    fn render(&self, frame: &mut Frame) {
        let size = frame.area();

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(1),    // 回显区
                Constraint::Length(2), // 编辑区(输入行 + 模式行)
                Constraint::Length(1), // 状态行
            ])
            .split(size);

        self.render_scrollback(frame, chunks[0]);
        self.render_editor(frame, chunks[1]);
        self.render_status_line(frame, chunks[2]);
    }

    fn render_scrollback(&self, frame: &mut Frame, area: Rect) {
        let height = area.height as usize;
        let start = self.accepted.len().saturating_sub(height);
        let lines: Vec<Line> = self.accepted[start..]
            .iter()
            .map(|line| Line::from(format!("~> {line}")))
            .collect();
        frame.render_widget(Paragraph::new(lines), area);
    }

    fn render_editor(&self, frame: &mut Frame, area: Rect) {
        let width = area.width as usize;
        let height = area.height as usize;
        if width == 0 || height == 0 {
            return;
        }

        let buf = self.app.render(width, height);
        let lines: Vec<Line> = buf.lines.iter().map(|line| cells_to_line(line)).collect();
        frame.render_widget(Paragraph::new(lines), area);

        // 光标跟随内核的 dot
        if let Some(dot) = buf.dot {
            let x = area.x + dot.col.min(width.saturating_sub(1)) as u16;
            let y = area.y + dot.line as u16;
            if dot.line < height {
                frame.set_cursor_position((x, y));
            }
        }
    }

    fn render_status_line(&self, frame: &mut Frame, area: Rect) {
        let status = self
            .status
            .lock()
            .map(|status| status.clone())
            .unwrap_or_default();
        let text = if status.is_empty() {
            "Up: 历史漫游  Enter: 提交/接受  Esc: 取消  Ctrl+D: 退出".to_string()
        } else {
            status
        };
        let line = Line::from(Span::styled(text, Style::default().fg(Color::DarkGray)));
        frame.render_widget(Paragraph::new(line), area);
    }
}

/// 把 crossterm 按键翻译成内核事件
fn translate_key(key: KeyEvent) -> Option<term::Event> {
    let key = match key.code {
        KeyCode::Char(ch) if key.modifiers.contains(KeyModifiers::CONTROL) => term::Key::Ctrl(ch),
        KeyCode::Char(ch) if key.modifiers.contains(KeyModifiers::ALT) => term::Key::Alt(ch),
        KeyCode::Char(ch) => term::Key::Char(ch),
        KeyCode::Enter => term::Key::Enter,
        KeyCode::Tab => term::Key::Tab,
        KeyCode::Backspace => term::Key::Backspace,
        KeyCode::Delete => term::Key::Delete,
        KeyCode::Up => term::Key::Up,
        KeyCode::Down => term::Key::Down,
        KeyCode::Left => term::Key::Left,
        KeyCode::Right => term::Key::Right,
        KeyCode::Home => term::Key::Home,
        KeyCode::End => term::Key::End,
        KeyCode::Esc => term::Key::Esc,
        _ => return None,
    };
    Some(term::Event::Key(key))
}

fn style_for_style_ids(style_ids: &[StyleId]) -> Style {
    let mut style = Style::default();
    for &style_id in style_ids {
        match style_id {
            STYLE_MODE_LINE => {
                style = style
                    .fg(Color::Black)
                    .bg(Color::LightGreen)
                    .add_modifier(Modifier::BOLD);
            }
            STYLE_PENDING => {
                style = style.add_modifier(Modifier::UNDERLINED);
            }
            STYLE_PROMPT => {
                style = style.fg(Color::Cyan).add_modifier(Modifier::BOLD);
            }
            _ => {}
        }
    }
    style
}

/// 把一行 cell 合并成 ratatui 的 Line(相邻同样式的 cell 合并为一个 Span)
fn cells_to_line(cells: &[Cell]) -> Line<'static> {
    let mut spans: Vec<Span> = Vec::new();
    let mut current_style: Option<Style> = None;
    let mut buffer = String::new();

    for cell in cells {
        let style = style_for_style_ids(&cell.styles);
        if current_style.is_none() {
            current_style = Some(style);
        }
        if current_style != Some(style) {
            spans.push(Span::styled(
                std::mem::take(&mut buffer),
                current_style.unwrap_or_default(),
            ));
            current_style = Some(style);
        }
        buffer.push(cell.ch);
    }
    if !buffer.is_empty() {
        spans.push(Span::styled(buffer, current_style.unwrap_or_default()));
    }

    Line::from(spans)
}

fn main() -> io::Result<()> {
    // 设置终端
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // 创建应用
    let mut repl = Repl::new();

    // 主循环
    let result = run_app(&mut terminal, &mut repl);

    // 恢复终端
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        eprintln!("错误: {}", err);
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    repl: &mut Repl,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| repl.render(f))?;

        if repl.should_quit {
            break;
        }

        // 处理事件
        if event::poll(std::time::Duration::from_millis(100))? {
            match event::read()? {
                Event::Key(key) => {
                    repl.handle_key_event(key);
                }
                Event::Paste(text) => {
                    repl.handle_paste(text);
                }
                Event::Resize(_, _) => {
                    // 重新渲染
                }
                _ => {}
            }
        }
    }

    Ok(())
}
