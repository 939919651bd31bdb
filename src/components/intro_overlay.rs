use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct IntroOverlayProps {
    pub show: bool,
    pub on_dismiss: Callback<()>,
}

#[function_component(IntroOverlay)]
pub fn intro_overlay(props: &IntroOverlayProps) -> Html {
    if !props.show {
        return html! {};
    }
    let dismiss_cb = props.on_dismiss.clone();
    let start_btn = Callback::from(move |_| dismiss_cb.emit(()));
    html! {
        <div style="position:absolute; top:50%; left:50%; transform:translate(-50%, -50%); background:rgba(0,0,0,0.87); border:2px solid #30363d; padding:28px 36px; border-radius:14px; max-width:520px; width:90%; box-shadow:0 0 0 1px #1a1f24, 0 6px 18px rgba(0,0,0,0.6); font-size:14px; line-height:1.4;">
            <h2 style="margin:0 0 12px 0; font-size:22px; color:#3fb950; text-align:center;">{"Eco City"}</h2>
            <p style="margin:4px 0 10px 0; text-align:center; opacity:0.85;">{"Clean up the city and watch it come back to life."}</p>
            <ul style="margin:0 0 12px 18px; padding:0; list-style:disc; display:flex; flex-direction:column; gap:4px;">
                <li>{"Enable a layer with the checkboxes on the right."}</li>
                <li>{"Drag solar panels onto the rooftop zones (they glow while you drag)."}</li>
                <li>{"Drag the recycling bins into the gap between the second and third building."}</li>
                <li>{"Drop the bus anywhere on the road; it snaps to a lane and starts driving."}</li>
                <li>{"Every correct placement thins the factory smoke and grows the trees."}</li>
                <li>{"Day fades into night on its own; traffic thins out after dark."}</li>
                <li>{"Press 'S' for a short mood boost, 'R' to reset the whole scene."}</li>
            </ul>
            <div style="display:flex; gap:12px; justify-content:center; margin-top:8px;">
                <button onclick={start_btn}>{"Start"}</button>
            </div>
            <div style="margin-top:12px; font-size:11px; opacity:0.6; text-align:center;">{"Tip: even a fully green city keeps a little haze around the factories."}</div>
        </div>
    }
}
