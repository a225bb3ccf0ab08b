use crate::utils::*;
use clap::Args;
use flipmatch_core as game;
use game::{Card, CardFace, CardId, ControllerState, Difficulty, FlipAction, Generation};
use gloo::timers::callback::{Interval, Timeout};
use yew::prelude::*;

#[derive(Copy, Clone, Debug, PartialEq)]
pub(crate) enum Msg {
    CardActivated(CardId),
    ResolvePair(Generation),
    ClearStatus(Generation),
    UpdateTime,
    StartGame,
    SelectDifficulty(Difficulty),
    Reset,
}

#[derive(Args, Properties, Debug, Clone, PartialEq)]
pub(crate) struct GameProps {
    /// Force a seed instead of random
    #[arg(short, long)]
    pub seed: Option<String>,
}

fn card_classes(face: CardFace) -> Classes {
    use CardFace::*;
    classes!(
        "card",
        match face {
            Down => classes!(),
            Up => classes!("flipped"),
            Matched => classes!("matched"),
        }
    )
}

#[derive(Properties, Clone, PartialEq)]
struct CardProps {
    card: Card,
    callback: Callback<CardId>,
}

#[function_component(CardView)]
fn card_component(props: &CardProps) -> Html {
    let Card { id, symbol, face } = props.card;

    let label = if face.is_face_up() {
        symbol.to_string()
    } else {
        "?".to_string()
    };

    let onclick = {
        let callback = props.callback.clone();
        Callback::from(move |_: MouseEvent| {
            log::trace!("card {} activated", id);
            callback.emit(id);
        })
    };

    html! {
        <button class={card_classes(face)} {onclick} disabled={face.is_matched()}>{label}</button>
    }
}

pub(crate) struct GameView {
    controller: game::GameController,
    selected_difficulty: Difficulty,
    forced_seed: Option<u64>,
    prev_time: u32,
    _timer_interval: Interval,
    // dropped (cancelled) on reset; the generation tag catches the rest
    pending_resolve: Option<Timeout>,
    pending_clear: Option<Timeout>,
}

impl GameView {
    fn create_timer(ctx: &Context<Self>) -> Interval {
        let link = ctx.link().clone();
        Interval::new(500, move || link.send_message(Msg::UpdateTime))
    }

    fn get_time(&self) -> u32 {
        self.controller.elapsed_secs(utc_now())
    }

    fn next_seed(&self) -> u64 {
        self.forced_seed.unwrap_or_else(js_random_seed)
    }

    fn start_label(&self) -> &'static str {
        match self.controller.state() {
            ControllerState::Idle => "Start Game",
            ControllerState::Playing => "Resume",
            ControllerState::Complete => "Play Again",
        }
    }

    fn schedule_resolve(&mut self, ctx: &Context<Self>, generation: Generation) {
        let link = ctx.link().clone();
        self.pending_resolve = Some(Timeout::new(game::RESOLVE_DELAY_MS, move || {
            link.send_message(Msg::ResolvePair(generation))
        }));
    }

    /// Transient messages auto-clear after a fixed timeout; the completion
    /// message stays up until the next game.
    fn schedule_status_clear(&mut self, ctx: &Context<Self>) {
        self.pending_clear = None;
        let transient = self
            .controller
            .status()
            .is_some_and(|message| message.is_transient());
        if transient && self.controller.is_active() {
            let generation = self.controller.generation();
            let link = ctx.link().clone();
            self.pending_clear = Some(Timeout::new(game::STATUS_CLEAR_MS, move || {
                link.send_message(Msg::ClearStatus(generation))
            }));
        }
    }
}

impl Component for GameView {
    type Message = Msg;
    type Properties = GameProps;

    fn create(ctx: &Context<Self>) -> Self {
        let forced_seed = ctx
            .props()
            .seed
            .as_deref()
            .and_then(|seed| seed.parse().ok());

        Self {
            controller: game::GameController::new(),
            selected_difficulty: Difficulty::default(),
            forced_seed,
            prev_time: 0,
            _timer_interval: GameView::create_timer(ctx),
            pending_resolve: None,
            pending_clear: None,
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        use Msg::*;

        match msg {
            StartGame => {
                let seed = self.next_seed();
                if let Err(err) = self
                    .controller
                    .start_game(self.selected_difficulty, seed, utc_now())
                {
                    log::error!("could not start game: {}", err);
                    return false;
                }
                self.pending_resolve = None;
                self.schedule_status_clear(ctx);
                true
            }
            SelectDifficulty(difficulty) => {
                if self.selected_difficulty != difficulty {
                    self.selected_difficulty = difficulty;
                    true
                } else {
                    false
                }
            }
            CardActivated(id) => match self.controller.flip_card(id) {
                Ok(FlipAction::NoChange) => false,
                Ok(FlipAction::Flipped) => true,
                Ok(FlipAction::PairPending(generation)) => {
                    self.schedule_resolve(ctx, generation);
                    true
                }
                Err(err) => {
                    log::error!("flip rejected: {}", err);
                    false
                }
            },
            ResolvePair(generation) => {
                self.pending_resolve = None;
                match self.controller.resolve_pair(generation, utc_now()) {
                    Ok(Some(_)) => {
                        self.schedule_status_clear(ctx);
                        true
                    }
                    Ok(None) => false,
                    Err(err) => {
                        log::error!("pair resolution failed: {}", err);
                        false
                    }
                }
            }
            ClearStatus(generation) => {
                self.pending_clear = None;
                self.controller.clear_transient_status(generation)
            }
            UpdateTime => {
                let time = self.get_time();
                if self.prev_time != time {
                    self.prev_time = time;
                    true
                } else {
                    false
                }
            }
            Reset => {
                self.pending_resolve = None;
                self.pending_clear = None;
                self.controller.reset();
                true
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        use Msg::*;

        let status = self.controller.status();
        let message_class = classes!("message", status.map(|message| message.kind.css_class()));
        let message_text = status.map(|message| message.text.clone()).unwrap_or_default();
        let elapsed = format_elapsed(self.get_time());

        let cb_card = ctx.link().callback(Msg::CardActivated);
        let cb_start = ctx.link().callback(|_: MouseEvent| StartGame);
        let cb_reset = ctx.link().callback(|_: MouseEvent| Reset);

        html! {
            <div class="flipmatch">
                <nav>
                    <aside>{"Moves: "}{self.controller.move_count()}</aside>
                    <aside>{"Matches: "}{self.controller.match_count()}</aside>
                    <aside>{elapsed}</aside>
                </nav>
                <div class={message_class}>{message_text}</div>
                <div class="controls">
                    {
                        for [Difficulty::Easy, Difficulty::Hard].into_iter().map(|difficulty| {
                            let onclick = ctx.link().callback(move |_: MouseEvent| SelectDifficulty(difficulty));
                            html! {
                                <label>
                                    <input
                                        type="radio"
                                        name="difficulty"
                                        checked={self.selected_difficulty == difficulty}
                                        {onclick}
                                    />
                                    { difficulty.label() }
                                </label>
                            }
                        })
                    }
                    <button onclick={cb_start}>{self.start_label()}</button>
                    <button onclick={cb_reset}>{"Reset"}</button>
                </div>
                <div class="board" style="grid-template-columns: repeat(4, 1fr);">
                    {
                        for self.controller.cards().iter().map(|card| html! {
                            <CardView card={*card} callback={cb_card.clone()} />
                        })
                    }
                </div>
            </div>
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn card_classes_follow_the_face() {
        assert_eq!(card_classes(CardFace::Down), classes!("card"));
        assert_eq!(card_classes(CardFace::Up), classes!("card", "flipped"));
        assert_eq!(card_classes(CardFace::Matched), classes!("card", "matched"));
    }

    #[test]
    fn forced_seed_prop_parses_like_create_does() {
        let props = GameProps {
            seed: Some("1234".to_string()),
        };
        let parsed: Option<u64> = props.seed.as_deref().and_then(|seed| seed.parse().ok());
        assert_eq!(parsed, Some(1234));

        let garbage = GameProps {
            seed: Some("not-a-seed".to_string()),
        };
        let parsed: Option<u64> = garbage.seed.as_deref().and_then(|seed| seed.parse().ok());
        assert_eq!(parsed, None);
    }
}
