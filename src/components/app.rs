use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use web_sys::KeyboardEvent;
use yew::prelude::*;

use super::controls_panel::ControlsPanel;
use super::intro_overlay::IntroOverlay;
use super::scene_view::SceneView;
use super::stats_panel::StatsPanel;
use crate::model::{ContributorHandle, SceneAction, SceneState};
use crate::util::{clog, format_percent};

/// 53 bits of browser randomness; plenty for a decorative scene seed.
fn random_seed() -> u64 {
    (js_sys::Math::random() * 9_007_199_254_740_992.0) as u64
}

#[function_component(App)]
pub fn app() -> Html {
    let scene = use_reducer(|| SceneState::new(random_seed()));
    let show_intro = use_state(|| true);
    let last_total = use_mut_ref(|| 0.0_f64);

    // Keyboard: 'R' resets the whole scene
    {
        let scene = scene.clone();
        use_effect_with((), move |_| {
            let window = web_sys::window().unwrap();
            let key_cb = {
                let scene = scene.clone();
                Closure::wrap(Box::new(move |e: KeyboardEvent| {
                    if e.key().eq_ignore_ascii_case("r") || e.code() == "KeyR" {
                        e.prevent_default();
                        clog("scene reset");
                        scene.dispatch(SceneAction::ResetAll);
                    } else if e.key().eq_ignore_ascii_case("s") || e.code() == "KeyS" {
                        // stand-in for the external smile detector
                        e.prevent_default();
                        scene.dispatch(SceneAction::ApplyBoost {
                            amount: crate::config::SMILE_BOOST_AMOUNT,
                        });
                    }
                }) as Box<dyn FnMut(_)>)
            };
            window
                .add_event_listener_with_callback("keydown", key_cb.as_ref().unchecked_ref())
                .unwrap();
            move || {
                let _ = window.remove_event_listener_with_callback(
                    "keydown",
                    key_cb.as_ref().unchecked_ref(),
                );
                drop(key_cb);
            }
        });
    }

    // Log mitigation changes
    {
        let total = scene.mitigation.total;
        let last_total = last_total.clone();
        use_effect_with(total, move |_| {
            let mut prev = last_total.borrow_mut();
            if (*prev - total).abs() > 1e-9 {
                clog(&format!(
                    "mitigation: {} -> {}",
                    format_percent(*prev),
                    format_percent(total)
                ));
            }
            *prev = total;
            || ()
        });
    }

    let panels_on = scene.show_panels;
    let recycling_on = scene.show_recycling;
    let transit_on = scene.show_transit;

    let toggle_panels = {
        let scene = scene.clone();
        Callback::from(move |_| scene.dispatch(SceneAction::SetPanelsVisible(!panels_on)))
    };
    let toggle_recycling = {
        let scene = scene.clone();
        Callback::from(move |_| scene.dispatch(SceneAction::SetRecyclingVisible(!recycling_on)))
    };
    let toggle_transit = {
        let scene = scene.clone();
        Callback::from(move |_| scene.dispatch(SceneAction::SetTransitVisible(!transit_on)))
    };
    let reset = {
        let scene = scene.clone();
        Callback::from(move |_| scene.dispatch(SceneAction::ResetAll))
    };
    let hide_intro = {
        let show_intro = show_intro.clone();
        Callback::from(move |_| show_intro.set(false))
    };

    // No detector is wired up in this build; the scene view simply polls
    // nothing. A webcam/ML integration would drop its contributor in here.
    let contributor = ContributorHandle::default();

    html! {
        <div id="root" style="position:relative; width:100vw; height:100vh; background:#0e1116; color:#e6edf3; font-family:system-ui, sans-serif; display:flex; align-items:center; justify-content:center;">
            <SceneView scene={scene.clone()} contributor={contributor} />
            <StatsPanel
                mitigation={scene.mitigation}
                growth={scene.growth}
                cycle_pos={scene.day_night.cycle_pos}
                is_night={scene.day_night.is_night()}
                smoke_count={scene.smoke.len()}
            />
            <ControlsPanel
                show_panels={panels_on}
                show_recycling={recycling_on}
                show_transit={transit_on}
                on_toggle_panels={toggle_panels}
                on_toggle_recycling={toggle_recycling}
                on_toggle_transit={toggle_transit}
                on_reset={reset}
            />
            <IntroOverlay show={*show_intro} on_dismiss={hide_intro} />
        </div>
    }
}
