use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct ControlsPanelProps {
    pub show_panels: bool,
    pub show_recycling: bool,
    pub show_transit: bool,
    pub on_toggle_panels: Callback<()>,
    pub on_toggle_recycling: Callback<()>,
    pub on_toggle_transit: Callback<()>,
    pub on_reset: Callback<()>,
}

#[function_component]
pub fn ControlsPanel(props: &ControlsPanelProps) -> Html {
    let panels_cb = {
        let cb = props.on_toggle_panels.clone();
        Callback::from(move |_| cb.emit(()))
    };
    let recycling_cb = {
        let cb = props.on_toggle_recycling.clone();
        Callback::from(move |_| cb.emit(()))
    };
    let transit_cb = {
        let cb = props.on_toggle_transit.clone();
        Callback::from(move |_| cb.emit(()))
    };
    let reset_cb = {
        let cb = props.on_reset.clone();
        Callback::from(move |_| cb.emit(()))
    };
    let label_style = "display:flex; align-items:center; gap:8px; cursor:pointer;";
    html! {<div style="position:absolute; top:12px; right:12px; background:rgba(22,27,34,0.9); border:1px solid #30363d; border-radius:8px; padding:10px 12px; min-width:200px; display:flex; flex-direction:column; gap:8px;">
        <div style="font-weight:600;">{"City layers"}</div>
        <label style={label_style}>
            <input type="checkbox" checked={props.show_panels} onclick={panels_cb} />
            <span>{"Solar panels"}</span>
        </label>
        <label style={label_style}>
            <input type="checkbox" checked={props.show_recycling} onclick={recycling_cb} />
            <span>{"Recycling bins"}</span>
        </label>
        <label style={label_style}>
            <input type="checkbox" checked={props.show_transit} onclick={transit_cb} />
            <span>{"Public transit"}</span>
        </label>
        <button onclick={reset_cb}>{"Reset scene"}</button>
        <div style="font-size:11px; opacity:0.7;">{"Hotkey: 'R' resets everything"}</div>
    </div>}
}
