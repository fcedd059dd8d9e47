use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;

use career_guide_core::pages::HomePage;
use career_guide_core::{CompanyPage, NavDock, Route};

use crate::app::{App, InputMode};
use crate::tui::AppEvent;

pub fn handle_event(app: &mut App, event: AppEvent) {
    match event {
        AppEvent::Key(key) => handle_key(app, key),
        AppEvent::Mouse(mouse) => handle_mouse(app, mouse),
        AppEvent::Resize => {
            if app.route == Route::ChatBot {
                app.scroll_chat_to_bottom();
            }
        }
        AppEvent::Tick => app.tick(),
        AppEvent::Completion(outcome) => app.complete_chat(outcome),
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    // Global keys that work in any mode
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return;
    }

    // Any key dismisses the last status notice
    app.status_message = None;

    if app.show_api_key_input {
        handle_api_key_input(app, key);
        return;
    }

    match app.input_mode {
        InputMode::Normal => handle_normal_mode(app, key),
        InputMode::Editing => handle_chat_editing(app, key),
    }
}

fn handle_api_key_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.close_api_key_input(),
        KeyCode::Enter => app.save_api_key(),
        KeyCode::Backspace => app.api_key_backspace(),
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.api_key_insert(c)
        }
        _ => {}
    }
}

fn handle_normal_mode(app: &mut App, key: KeyEvent) {
    // Dock navigation first; it is the same on every page
    match key.code {
        KeyCode::Char('q') => {
            app.should_quit = true;
            return;
        }
        KeyCode::Char(c @ '1'..='9') => {
            let idx = c as usize - '1' as usize;
            if let Some(item) = NavDock::items().get(idx) {
                app.navigate(item.route);
            }
            return;
        }
        KeyCode::Tab => {
            app.navigate(NavDock::cycle(app.route, true));
            return;
        }
        KeyCode::BackTab => {
            app.navigate(NavDock::cycle(app.route, false));
            return;
        }
        _ => {}
    }

    match app.route {
        Route::Home => handle_home(app, key),
        Route::ChatBot => handle_chat_normal(app, key),
        route if CompanyPage::for_route(route).is_some() => handle_company_page(app, key),
        _ => handle_page_scroll(app, key),
    }
}

fn handle_home(app: &mut App, key: KeyEvent) {
    if let KeyCode::Char(c) = key.code {
        if let Some(link) = HomePage::LINKS.iter().find(|link| link.key == c) {
            app.navigate(link.route);
        }
    }
}

fn handle_company_page(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Left | KeyCode::Char('h') => app.carousel_step(false),
        KeyCode::Right | KeyCode::Char('l') => app.carousel_step(true),
        KeyCode::Esc => app.navigate(Route::Home),
        _ => handle_page_scroll(app, key),
    }
}

fn handle_page_scroll(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Down | KeyCode::Char('j') => app.scroll_page_down(),
        KeyCode::Up | KeyCode::Char('k') => app.scroll_page_up(),
        KeyCode::Esc if app.route != Route::Home => app.navigate(Route::Home),
        _ => {}
    }
}

fn handle_chat_normal(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('i') | KeyCode::Enter => app.input_mode = InputMode::Editing,
        KeyCode::Down | KeyCode::Char('j') => app.scroll_chat_down(),
        KeyCode::Up | KeyCode::Char('k') => app.scroll_chat_up(),
        KeyCode::Char('G') => app.scroll_chat_to_bottom(),
        KeyCode::Char('K') => app.open_api_key_input(),
        KeyCode::Esc => app.navigate(Route::Home),
        _ => {}
    }
}

fn handle_chat_editing(app: &mut App, key: KeyEvent) {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    match key.code {
        KeyCode::Esc => {
            app.input_mode = InputMode::Normal;
        }
        // Shift+Enter only arrives on terminals with keyboard enhancement;
        // Alt+Enter works everywhere.
        KeyCode::Enter
            if key.modifiers.contains(KeyModifiers::SHIFT)
                || key.modifiers.contains(KeyModifiers::ALT) =>
        {
            app.draft_insert('\n');
        }
        KeyCode::Enter => app.submit_chat(),
        KeyCode::Char('k') if ctrl => app.open_api_key_input(),
        KeyCode::Backspace => app.draft_backspace(),
        KeyCode::Delete => app.draft_delete(),
        KeyCode::Left => app.draft_cursor_left(),
        KeyCode::Right => app.draft_cursor_right(),
        KeyCode::Home => app.draft_cursor_home(),
        KeyCode::End => app.draft_cursor_end(),
        KeyCode::Up | KeyCode::PageUp => app.scroll_chat_up(),
        KeyCode::Down | KeyCode::PageDown => app.scroll_chat_down(),
        KeyCode::Char(c) if !ctrl => app.draft_insert(c),
        _ => {}
    }
}

/// Check if a point is within a rectangle
fn point_in_rect(x: u16, y: u16, rect: Rect) -> bool {
    x >= rect.x && x < rect.x + rect.width && y >= rect.y && y < rect.y + rect.height
}

fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    let x = mouse.column;
    let y = mouse.row;

    let in_chat = app.route == Route::ChatBot
        && app.chat_area.map(|r| point_in_rect(x, y, r)).unwrap_or(false);
    let in_page = app.page_area.map(|r| point_in_rect(x, y, r)).unwrap_or(false);

    match mouse.kind {
        MouseEventKind::ScrollDown => {
            if in_chat {
                app.scroll_chat_down();
            } else if in_page {
                app.scroll_page_down();
            }
        }
        MouseEventKind::ScrollUp => {
            if in_chat {
                app.scroll_chat_up();
            } else if in_page {
                app.scroll_page_up();
            }
        }
        _ => {}
    }
}
