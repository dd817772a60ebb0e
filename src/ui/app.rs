//! Main application for the Gomoku GUI

use eframe::egui;
use egui::{CentralPanel, Context, CornerRadius, Frame, RichText, SidePanel, TopBottomPanel, Vec2};

use super::board_view::{BoardView, Overlay};
use super::game_state::GameState;
use super::theme::*;
use crate::board::{DEFAULT_BOARD_SIZE, STANDARD_SIZES};
use crate::config::{Difficulty, EngineConfig};
use crate::error::Result;
use crate::session::GameMode;
use crate::Stone;

/// Options picked in the new-game menu
#[derive(Debug, Clone, Copy)]
struct NewGameSettings {
    size: usize,
    vs_ai: bool,
    ai_color: Stone,
    difficulty: Difficulty,
}

impl Default for NewGameSettings {
    fn default() -> Self {
        Self {
            size: DEFAULT_BOARD_SIZE,
            vs_ai: true,
            ai_color: Stone::White,
            difficulty: Difficulty::Easy,
        }
    }
}

impl NewGameSettings {
    fn mode(&self) -> GameMode {
        if self.vs_ai {
            GameMode::PvC {
                ai_color: self.ai_color,
                difficulty: self.difficulty,
            }
        } else {
            GameMode::PvP
        }
    }
}

/// Main Gomoku application
pub struct GomokuApp {
    state: GameState,
    board_view: BoardView,
    settings: NewGameSettings,
    show_debug: bool,
}

impl GomokuApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, config: EngineConfig) -> Result<Self> {
        let settings = NewGameSettings::default();
        Ok(Self {
            state: GameState::new(settings.size, settings.mode(), config)?,
            board_view: BoardView::default(),
            settings,
            show_debug: true,
        })
    }

    fn start_new_game(&mut self) {
        self.state.new_game(self.settings.size, self.settings.mode());
    }

    /// Render the top menu bar
    fn render_menu_bar(&mut self, ctx: &Context) {
        TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("Game", |ui| {
                    ui.label(RichText::new("Board size").size(11.0).color(TEXT_MUTED));
                    ui.horizontal(|ui| {
                        for size in STANDARD_SIZES {
                            ui.radio_value(&mut self.settings.size, size, format!("{size}x{size}"));
                        }
                    });
                    ui.separator();
                    ui.checkbox(&mut self.settings.vs_ai, "Play against the computer");
                    ui.add_enabled_ui(self.settings.vs_ai, |ui| {
                        ui.horizontal(|ui| {
                            ui.label("AI plays");
                            ui.radio_value(&mut self.settings.ai_color, Stone::White, "White");
                            ui.radio_value(&mut self.settings.ai_color, Stone::Black, "Black");
                        });
                        ui.horizontal(|ui| {
                            for difficulty in Difficulty::ALL {
                                ui.radio_value(
                                    &mut self.settings.difficulty,
                                    difficulty,
                                    difficulty.to_string(),
                                );
                            }
                        });
                    });
                    ui.separator();
                    if ui.button("New Game (N)").clicked() {
                        self.start_new_game();
                        ui.close_menu();
                    }
                    ui.separator();
                    if ui.button("Save").clicked() {
                        self.state.save();
                        ui.close_menu();
                    }
                    if ui.button("Load").clicked() {
                        self.state.load();
                        ui.close_menu();
                    }
                });

                ui.menu_button("View", |ui| {
                    ui.checkbox(&mut self.show_debug, "Debug Panel (D)");
                });

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let mode_text = match self.state.session.mode() {
                        GameMode::PvC {
                            ai_color,
                            difficulty,
                        } => format!("vs AI ({difficulty}) - AI: {}", color_name(ai_color)),
                        GameMode::PvP => "PvP - Hotseat".to_string(),
                    };
                    ui.label(mode_text);
                });
            });
        });
    }

    /// Render the side panel with game info and debug
    fn render_side_panel(&mut self, ctx: &Context) {
        SidePanel::right("info_panel")
            .min_width(240.0)
            .max_width(280.0)
            .frame(Frame::new().fill(PANEL_BG))
            .show(ctx, |ui| {
                ui.add_space(12.0);
                self.render_title_card(ui);
                ui.add_space(12.0);
                self.render_turn_card(ui);
                ui.add_space(10.0);
                self.render_timer_card(ui);
                ui.add_space(10.0);
                self.render_history_card(ui);
                ui.add_space(10.0);
                self.render_actions_card(ui);

                if self.show_debug {
                    ui.add_space(10.0);
                    self.render_debug_card(ui);
                }

                if self.state.session.is_over() {
                    ui.add_space(10.0);
                    self.render_game_over_card(ui);
                }

                if let Some(msg) = self.state.message.clone() {
                    ui.add_space(10.0);
                    Self::render_message_card(ui, &msg);
                }
            });
    }

    /// Helper to create a card frame
    fn card_frame() -> Frame {
        Frame::new()
            .fill(CARD_BG)
            .corner_radius(CornerRadius::same(8))
            .inner_margin(12.0)
    }

    fn button_frame() -> Frame {
        Frame::new()
            .fill(BUTTON_BG)
            .corner_radius(CornerRadius::same(6))
            .inner_margin(8.0)
    }

    /// A frame-styled clickable label
    fn action_button(ui: &mut egui::Ui, text: &str, enabled: bool) -> bool {
        let color = if enabled { TEXT_PRIMARY } else { TEXT_MUTED };
        Self::button_frame()
            .show(ui, |ui| {
                let label = egui::Label::new(RichText::new(text).size(12.0).color(color));
                enabled && ui.add(label.sense(egui::Sense::click())).clicked()
            })
            .inner
    }

    fn render_title_card(&self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.add_space(8.0);
            ui.label(RichText::new("●○").size(20.0).color(egui::Color32::from_rgb(180, 180, 185)));
            ui.add_space(4.0);
            ui.label(RichText::new("GOMOKU").size(22.0).strong().color(TEXT_PRIMARY));
        });
        ui.horizontal(|ui| {
            ui.add_space(8.0);
            let size = self.state.session.size();
            ui.label(RichText::new(format!("{size}x{size} freestyle")).size(11.0).color(TEXT_MUTED));
        });
    }

    /// Render turn indicator card
    fn render_turn_card(&self, ui: &mut egui::Ui) {
        Self::card_frame().show(ui, |ui| {
            let is_black = self.state.current_turn() == Stone::Black;
            let (stone_char, accent) = if is_black {
                ("●", egui::Color32::from_rgb(70, 70, 75))
            } else {
                ("○", egui::Color32::from_rgb(220, 220, 225))
            };

            ui.horizontal(|ui| {
                let stone_color = if is_black { TEXT_PRIMARY } else { egui::Color32::from_rgb(30, 30, 35) };

                let (rect, _) = ui.allocate_exact_size(Vec2::new(48.0, 48.0), egui::Sense::hover());
                ui.painter().circle_filled(rect.center(), 22.0, accent);
                ui.painter().text(
                    rect.center(),
                    egui::Align2::CENTER_CENTER,
                    stone_char,
                    egui::FontId::proportional(28.0),
                    stone_color,
                );

                ui.add_space(12.0);

                ui.vertical(|ui| {
                    ui.add_space(4.0);
                    let name = color_name(self.state.current_turn()).to_uppercase();
                    ui.label(RichText::new(name).size(18.0).strong().color(TEXT_PRIMARY));

                    let status = if self.state.is_ai_thinking() {
                        ("AI thinking...", TIMER_WARNING)
                    } else if self.state.session.is_over() {
                        ("Game Over", WIN_HIGHLIGHT)
                    } else if !self.state.session.is_latest() {
                        ("Reviewing history", TEXT_SECONDARY)
                    } else if self.state.is_human_turn() {
                        ("Your turn", TIMER_NORMAL)
                    } else {
                        ("AI to move", TEXT_SECONDARY)
                    };
                    ui.label(RichText::new(status.0).size(12.0).color(status.1));
                });
            });
        });
    }

    /// Render timer card
    fn render_timer_card(&self, ui: &mut egui::Ui) {
        Self::card_frame().show(ui, |ui| {
            ui.label(RichText::new("TIMER").size(10.0).color(TEXT_MUTED));
            ui.add_space(6.0);

            if let Some(elapsed) = self.state.ai_thinking_elapsed() {
                let secs = elapsed.as_secs_f32();
                let color = if secs < 1.0 {
                    TIMER_NORMAL
                } else if secs < 3.0 {
                    TIMER_WARNING
                } else {
                    TIMER_CRITICAL
                };
                ui.label(RichText::new(format!("{secs:.2}s")).size(28.0).strong().color(color));
            } else {
                let elapsed = self.state.move_timer.elapsed();
                ui.label(RichText::new(format!("{:.1}s", elapsed.as_secs_f32())).size(24.0).color(TEXT_PRIMARY));
            }

            if let Some(ai_time) = self.state.move_timer.ai_thinking_time {
                ui.add_space(4.0);
                ui.label(
                    RichText::new(format!("Last AI: {:.3}s", ai_time.as_secs_f32()))
                        .size(10.0)
                        .color(TEXT_SECONDARY),
                );
            }
        });
    }

    /// Render the history slider with undo/redo
    fn render_history_card(&mut self, ui: &mut egui::Ui) {
        Self::card_frame().show(ui, |ui| {
            ui.label(RichText::new("HISTORY").size(10.0).color(TEXT_MUTED));
            ui.add_space(8.0);

            let len = self.state.session.history().len();
            let mut turn = self.state.session.cursor();
            let slider = egui::Slider::new(&mut turn, 0..=len).text("move");
            if ui.add_enabled(len > 0, slider).changed() {
                self.state.jump_to(turn);
            }

            ui.add_space(6.0);
            ui.horizontal(|ui| {
                if Self::action_button(ui, "↩ Undo", self.state.session.can_undo()) {
                    self.state.undo();
                }
                ui.add_space(4.0);
                if Self::action_button(ui, "↪ Redo", self.state.session.can_redo()) {
                    self.state.redo();
                }
            });

            ui.add_space(8.0);
            ui.label(
                RichText::new(format!("Move #{} of {}", self.state.session.cursor(), len))
                    .size(11.0)
                    .color(TEXT_SECONDARY),
            );
        });
    }

    /// Render actions card
    fn render_actions_card(&mut self, ui: &mut egui::Ui) {
        Self::card_frame().show(ui, |ui| {
            ui.label(RichText::new("ACTIONS").size(10.0).color(TEXT_MUTED));
            ui.add_space(8.0);

            ui.horizontal(|ui| {
                if Self::action_button(ui, "Save", true) {
                    self.state.save();
                }
                ui.add_space(4.0);
                if Self::action_button(ui, "Load", true) {
                    self.state.load();
                }
                if self.state.session.mode() == GameMode::PvP {
                    ui.add_space(4.0);
                    if Self::action_button(ui, "Hint", !self.state.session.is_over()) {
                        self.state.request_suggestion();
                    }
                }
            });
        });
    }

    /// Render debug card
    fn render_debug_card(&self, ui: &mut egui::Ui) {
        Frame::new()
            .fill(egui::Color32::from_rgb(30, 33, 38))
            .corner_radius(CornerRadius::same(8))
            .inner_margin(12.0)
            .show(ui, |ui| {
                ui.label(RichText::new("AI DEBUG").size(10.0).color(TEXT_MUTED));
                ui.add_space(6.0);

                let Some(report) = &self.state.last_ai_result else {
                    ui.label(RichText::new("Waiting for AI...").size(10.0).color(TEXT_MUTED));
                    return;
                };

                ui.horizontal(|ui| {
                    ui.vertical(|ui| {
                        let stage = report
                            .search_type
                            .map_or_else(|| "-".to_string(), |t| format!("{t:?}"));
                        ui.label(RichText::new(stage).size(11.0).strong().color(TIMER_NORMAL));
                        ui.label(RichText::new(format!("Score: {}", report.score)).size(10.0).color(TEXT_SECONDARY));
                    });
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::TOP), |ui| {
                        ui.vertical(|ui| {
                            ui.label(RichText::new(format!("{}ms", report.time_ms)).size(10.0).color(TEXT_SECONDARY));
                            ui.label(
                                RichText::new(format!(
                                    "{} nodes / {} cutoffs",
                                    report.stats.nodes, report.stats.cutoffs
                                ))
                                .size(10.0)
                                .color(TEXT_MUTED),
                            );
                        });
                    });
                });

                if let Some(pos) = report.outcome.as_move() {
                    let col = (b'A' + pos.col) as char;
                    let row = self.state.session.size() - pos.row as usize;
                    ui.add_space(4.0);
                    ui.label(RichText::new(format!("→ {col}{row}")).size(12.0).strong().color(WIN_HIGHLIGHT));
                }
            });
    }

    /// Render game over card
    fn render_game_over_card(&mut self, ui: &mut egui::Ui) {
        let headline = match self.state.session.winner() {
            Some(winner) => format!("{} WINS!", color_name(winner).to_uppercase()),
            None => "DRAW".to_string(),
        };

        Frame::new()
            .fill(egui::Color32::from_rgb(45, 80, 55))
            .corner_radius(CornerRadius::same(8))
            .inner_margin(16.0)
            .show(ui, |ui| {
                ui.vertical_centered(|ui| {
                    ui.label(RichText::new("GAME OVER").size(12.0).color(egui::Color32::from_rgb(180, 255, 180)));
                    ui.add_space(8.0);
                    ui.label(RichText::new(headline).size(18.0).strong().color(TEXT_PRIMARY));
                    ui.add_space(12.0);

                    if Self::action_button(ui, "New Game", true) {
                        self.start_new_game();
                    }
                });
            });
    }

    /// Render status message card
    fn render_message_card(ui: &mut egui::Ui, msg: &str) {
        Frame::new()
            .fill(egui::Color32::from_rgb(80, 60, 30))
            .corner_radius(CornerRadius::same(8))
            .inner_margin(10.0)
            .show(ui, |ui| {
                ui.label(RichText::new(msg).size(11.0).color(TEXT_PRIMARY));
            });
    }

    /// Render the main board
    fn render_board(&mut self, ctx: &Context) {
        CentralPanel::default().show(ctx, |ui| {
            ui.style_mut().visuals.panel_fill = egui::Color32::from_rgb(40, 42, 46);

            let session = &self.state.session;
            let overlay = Overlay {
                current_turn: session.current_player(),
                last_move: session.last_move().map(|m| m.pos),
                suggested_move: self.state.suggested_move,
                winning_line: session.winning_line(),
                interactive: !session.is_over()
                    && !self.state.is_ai_thinking()
                    && self.state.is_human_turn(),
            };
            let clicked = self.board_view.show(ui, session.board(), &overlay);

            if let Some(pos) = clicked {
                if let Err(msg) = self.state.try_place_stone(pos) {
                    self.state.message = Some(msg);
                }
            }
        });
    }

    /// Handle keyboard shortcuts
    fn handle_input(&mut self, ctx: &Context) {
        let (debug, hint, undo, redo, new_game) = ctx.input(|i| {
            (
                i.key_pressed(egui::Key::D),
                i.key_pressed(egui::Key::H),
                i.key_pressed(egui::Key::U),
                i.key_pressed(egui::Key::R),
                i.key_pressed(egui::Key::N),
            )
        });

        if debug {
            self.show_debug = !self.show_debug;
        }
        if hint && self.state.session.mode() == GameMode::PvP {
            self.state.request_suggestion();
        }
        if undo {
            self.state.undo();
        }
        if redo {
            self.state.redo();
        }
        if new_game {
            self.start_new_game();
        }
    }
}

fn color_name(stone: Stone) -> &'static str {
    match stone {
        Stone::Black => "Black",
        Stone::White => "White",
        Stone::Empty => "-",
    }
}

impl eframe::App for GomokuApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        self.handle_input(ctx);
        self.state.check_ai_result();

        if self.state.session.is_ai_turn() && !self.state.is_ai_thinking() {
            self.state.start_ai_thinking();
        }

        self.render_menu_bar(ctx);
        self.render_side_panel(ctx);
        self.render_board(ctx);

        // Keep polling the worker and the timer
        if self.state.is_ai_thinking() {
            ctx.request_repaint();
        }
    }
}
