use yew::prelude::*;

use crate::model::MitigationState;
use crate::util::format_percent;

#[derive(Properties, PartialEq, Clone)]
pub struct StatsPanelProps {
    pub mitigation: MitigationState,
    pub growth: f64,
    pub cycle_pos: f64,
    pub is_night: bool,
    pub smoke_count: usize,
}

fn time_of_day_label(cycle_pos: f64) -> &'static str {
    if cycle_pos < 0.25 {
        "Day"
    } else if cycle_pos < 0.5 {
        "Sunset"
    } else if cycle_pos < 0.75 {
        "Night"
    } else {
        "Sunrise"
    }
}

#[function_component]
pub fn StatsPanel(props: &StatsPanelProps) -> Html {
    let row_style = "display:flex; align-items:center; gap:8px;"; // icon | label | value
    let icon_style = "width:20px; text-align:center; flex-shrink:0;";
    let label_style = "flex:1; font-weight:500;";
    let value_style =
        "min-width:56px; text-align:right; font-variant-numeric:tabular-nums; font-weight:600;";
    let m = props.mitigation;
    html! {
        <div style="position:absolute; top:12px; left:12px; background:rgba(22,27,34,0.9); border:1px solid #30363d; border-radius:8px; padding:10px 14px; min-width:220px; display:flex; flex-direction:column; gap:8px; font-size:14px;">
            <div style={row_style}>
                <span style={format!("{} color:#3fb950;", icon_style)}>{"🌱"}</span>
                <span style={format!("{} color:#3fb950;", label_style)}>{"Mitigation"}</span>
                <span style={format!("{} color:#3fb950;", value_style)}>{ format_percent(m.total) }</span>
            </div>
            <div style="font-size:11px; opacity:0.7; margin-left:28px;">
                { format!(
                    "panels {} · recycling {} · transit {} · smile {}",
                    format_percent(m.from_panels),
                    format_percent(m.from_recycling),
                    format_percent(m.from_transit),
                    format_percent(m.from_smile),
                ) }
            </div>
            <div style={row_style}>
                <span style={format!("{} color:#56d364;", icon_style)}>{"🌳"}</span>
                <span style={format!("{} color:#56d364;", label_style)}>{"Plant growth"}</span>
                <span style={format!("{} color:#56d364;", value_style)}>{ format_percent(props.growth) }</span>
            </div>
            <div style={row_style}>
                <span style={format!("{} color:#8b949e;", icon_style)}>{"🌫"}</span>
                <span style={format!("{} color:#8b949e;", label_style)}>{"Smoke puffs"}</span>
                <span style={format!("{} color:#8b949e;", value_style)}>{ props.smoke_count }</span>
            </div>
            <div style={row_style}>
                <span style={format!("{} color:#d4af37;", icon_style)}>{ if props.is_night { "☾" } else { "☀" } }</span>
                <span style={format!("{} color:#d4af37;", label_style)}>{"Time of day"}</span>
                <span style={format!("{} color:#d4af37;", value_style)}>{ time_of_day_label(props.cycle_pos) }</span>
            </div>
        </div>
    }
}
