use chrono::Local;
use maud::{html, Markup, PreEscaped, DOCTYPE};

use crate::explain::FeatureImportanceRanking;
use crate::predictor::{round4, Prediction};
use crate::report::fields::{label_for, widget_for, Widget};
use crate::report::plots::importance_plot_html;
use crate::schema::NameMapping;

const PLOTLY_CDN: &str = "https://cdn.plot.ly/plotly-2.12.1.min.js";

const STYLE: &str = "
body { font-family: sans-serif; max-width: 960px; margin: 2em auto; color: #222; }
h1 { color: #b22222; }
form.inputs { display: grid; grid-template-columns: 1fr 1fr; gap: 0.6em 2em; }
form.inputs label { display: flex; flex-direction: column; font-size: 0.9em; }
.score { font-size: 2.2em; font-weight: bold; }
.risk-low { color: #2e7d32; }
.risk-moderate { color: #ef6c00; }
.risk-high { color: #c62828; }
.slider-row { display: grid; grid-template-columns: 14em 1fr 5em; align-items: center; gap: 1em; }
.muted { color: #777; font-size: 0.85em; }
";

fn page(title: &str, with_plotly: bool, body: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (title) }
                style { (PreEscaped(STYLE)) }
                @if with_plotly {
                    script src=(PLOTLY_CDN) {}
                }
            }
            body { (body) }
        }
    }
}

fn input_widget(name: &str) -> Markup {
    match widget_for(name) {
        Widget::Number { min, max, step } => html! {
            input type="number" name=(name) min=(min) max=(max) step=(step) required;
        },
        Widget::Select(options) => html! {
            select name=(name) {
                @for (value, text) in options {
                    option value=(value) { (text) }
                }
            }
        },
    }
}

/// Input form with one widget per configured form field.
pub fn render_index(form_fields: &[String], reference_link: &str) -> Markup {
    page(
        "Cardiovascular risk check",
        false,
        html! {
            h1 { "Cardiovascular risk check" }
            p {
                "Enter your measurements. The estimate combines a clinical heart-disease model "
                "with a ten-year Framingham model."
            }
            form.inputs method="post" action="/predict" {
                @for field in form_fields {
                    label {
                        (label_for(field))
                        (input_widget(field))
                    }
                }
                div { button type="submit" { "Estimate risk" } }
            }
            p.muted {
                "This tool is informational only. "
                a href=(reference_link) target="_blank" { "Learn more about cardiovascular disease" }
            }
        },
    )
}

/// Everything the results page shows.
pub struct ResultsView<'a> {
    pub prediction: &'a Prediction,
    pub mapping: &'a NameMapping,
    pub ranking: &'a FeatureImportanceRanking,
    pub reference_link: &'a str,
}

fn percent(p: f64) -> String {
    format!("{:.1}%", round4(p) * 100.0)
}

fn slider(column: &str, value: f64, mapping: &NameMapping) -> Markup {
    let field = mapping.form_field(column).unwrap_or(column);
    let (min, max, step) = widget_for(field).range();
    let min = min.min(value);
    let max = max.max(value);
    html! {
        div.slider-row {
            span { (label_for(field)) " " span.muted { "(" (column) ")" } }
            input.feature-slider type="range" data-column=(column)
                min=(min) max=(max) step=(step) value=(value);
            output data-for=(column) { (value) }
        }
    }
}

// Re-posts the base inputs plus every slider value and updates the page in place.
const SLIDER_SCRIPT: &str = r#"
(function () {
  const sliders = document.querySelectorAll('.feature-slider');
  let pending = null;
  function overlay() {
    const modified = {};
    sliders.forEach(function (s) { modified[s.dataset.column] = parseFloat(s.value); });
    return modified;
  }
  function pct(p) { return (p * 100).toFixed(1) + '%'; }
  function render(r) {
    document.getElementById('final-prob').textContent = pct(r.final_prob);
    const cat = document.getElementById('final-cat');
    cat.textContent = r.final_cat;
    cat.className = 'score ' + {'Low Risk': 'risk-low', 'Moderate Risk': 'risk-moderate', 'High Risk': 'risk-high'}[r.final_cat];
    document.getElementById('uci-prob').textContent = pct(r.uci_prob);
    document.getElementById('fram-prob').textContent = pct(r.fram_prob);
    const tips = document.getElementById('tips-list');
    tips.innerHTML = '';
    r.tips.forEach(function (t) {
      const li = document.createElement('li');
      const b = document.createElement('b');
      b.textContent = t.feature + ': ';
      li.appendChild(b);
      li.appendChild(document.createTextNode(t.tip));
      tips.appendChild(li);
    });
  }
  function update() {
    fetch('/predict', {
      method: 'POST',
      headers: {'Content-Type': 'application/json'},
      body: JSON.stringify({base_inputs: BASE_INPUTS, modified: overlay()})
    }).then(function (resp) { return resp.json(); }).then(render);
  }
  sliders.forEach(function (s) {
    s.addEventListener('input', function () {
      document.querySelector('output[data-for="' + s.dataset.column + '"]').textContent = s.value;
      clearTimeout(pending);
      pending = setTimeout(update, 150);
    });
  });
})();
"#;

/// Results page with the score, sliders over the top features and tips.
pub fn render_results(view: &ResultsView) -> Markup {
    let prediction = view.prediction;
    let base_inputs = serde_json::to_string(&prediction.base_inputs)
        .unwrap_or_else(|_| "{}".to_string())
        .replace("</", "<\\/");
    let generated = Local::now().format("%Y-%m-%d %H:%M");

    page(
        "Your cardiovascular risk",
        true,
        html! {
            h1 { "Your cardiovascular risk" }
            section {
                div #final-prob .score { (percent(prediction.final_prob)) }
                div id="final-cat" class={ "score " (prediction.final_cat.css_class()) } {
                    (prediction.final_cat.label())
                }
                p.muted {
                    "Clinical model: " span #uci-prob { (percent(prediction.probabilities.p_uci)) }
                    " | Framingham model: " span #fram-prob { (percent(prediction.probabilities.p_fram)) }
                }
            }
            section {
                h2 { "Explore the most influential factors" }
                p.muted { "Move a slider to see how the estimate changes." }
                @for fv in &prediction.top_features_values {
                    (slider(&fv.name, fv.value, view.mapping))
                }
                (PreEscaped(importance_plot_html(view.ranking)))
            }
            section {
                h2 { "Tips" }
                ul #tips-list {
                    @for tip in &prediction.tips {
                        li { b { (tip.feature) ": " } (tip.tip) }
                    }
                }
            }
            section {
                h2 { "Your inputs" }
                table {
                    @for (name, value) in prediction.base_inputs.iter() {
                        tr { td { (label_for(name)) } td { (value) } }
                    }
                }
            }
            p.muted {
                a href=(view.reference_link) target="_blank" { "World Health Organization: cardiovascular diseases" }
                " | generated " (generated)
            }
            p { a href="/" { "Start over" } }
            script { (PreEscaped(format!("const BASE_INPUTS = {};", base_inputs))) }
            script { (PreEscaped(SLIDER_SCRIPT)) }
        },
    )
}
