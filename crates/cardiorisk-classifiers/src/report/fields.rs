//! Input widgets for the form fields.

/// How a form field is entered.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Widget {
    Number { min: f64, max: f64, step: f64 },
    Select(&'static [(&'static str, &'static str)]),
}

impl Widget {
    /// Numeric range used for a slider over this field.
    pub fn range(&self) -> (f64, f64, f64) {
        match self {
            Widget::Number { min, max, step } => (*min, *max, *step),
            Widget::Select(options) => {
                let values = options.iter().filter_map(|(v, _)| v.parse::<f64>().ok());
                let (lo, hi) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
                    (lo.min(v), hi.max(v))
                });
                if lo.is_finite() && hi.is_finite() {
                    (lo, hi, 1.0)
                } else {
                    (0.0, 1.0, 1.0)
                }
            }
        }
    }
}

/// Label and widget for one form field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub widget: Widget,
}

const YES_NO: &[(&str, &str)] = &[("0", "No"), ("1", "Yes")];

const FIELD_SPECS: [FieldSpec; 23] = [
    FieldSpec { name: "age", label: "Age (years)", widget: Widget::Number { min: 18.0, max: 100.0, step: 1.0 } },
    FieldSpec { name: "sex", label: "Sex", widget: Widget::Select(&[("1", "Male"), ("0", "Female")]) },
    FieldSpec {
        name: "education",
        label: "Education level",
        widget: Widget::Select(&[
            ("1", "Some high school"),
            ("2", "High school or GED"),
            ("3", "Some college or vocational school"),
            ("4", "College degree"),
        ]),
    },
    FieldSpec { name: "currentSmoker", label: "Current smoker", widget: Widget::Select(YES_NO) },
    FieldSpec { name: "cigsPerDay", label: "Cigarettes per day", widget: Widget::Number { min: 0.0, max: 70.0, step: 1.0 } },
    FieldSpec { name: "BPMeds", label: "On blood pressure medication", widget: Widget::Select(YES_NO) },
    FieldSpec { name: "prevalentStroke", label: "Previous stroke", widget: Widget::Select(YES_NO) },
    FieldSpec { name: "prevalentHyp", label: "Hypertensive", widget: Widget::Select(YES_NO) },
    FieldSpec { name: "diabetes", label: "Diabetes", widget: Widget::Select(YES_NO) },
    FieldSpec { name: "BMI", label: "Body mass index", widget: Widget::Number { min: 12.0, max: 60.0, step: 0.1 } },
    FieldSpec { name: "heartRate", label: "Resting heart rate (bpm)", widget: Widget::Number { min: 40.0, max: 150.0, step: 1.0 } },
    FieldSpec { name: "sysBP", label: "Systolic blood pressure (mmHg)", widget: Widget::Number { min: 80.0, max: 250.0, step: 1.0 } },
    FieldSpec { name: "diaBP", label: "Diastolic blood pressure (mmHg)", widget: Widget::Number { min: 40.0, max: 150.0, step: 1.0 } },
    FieldSpec { name: "restingBpS", label: "Resting blood pressure (mmHg)", widget: Widget::Number { min: 80.0, max: 220.0, step: 1.0 } },
    FieldSpec { name: "maxHeartRate", label: "Maximum heart rate achieved", widget: Widget::Number { min: 60.0, max: 220.0, step: 1.0 } },
    FieldSpec {
        name: "chestPainType",
        label: "Chest pain type",
        widget: Widget::Select(&[
            ("1", "Typical angina"),
            ("2", "Atypical angina"),
            ("3", "Non-anginal pain"),
            ("4", "Asymptomatic"),
        ]),
    },
    FieldSpec { name: "cholesterol", label: "Serum cholesterol (mg/dl)", widget: Widget::Number { min: 0.0, max: 600.0, step: 1.0 } },
    FieldSpec { name: "totChol", label: "Total cholesterol (mg/dl)", widget: Widget::Number { min: 100.0, max: 600.0, step: 1.0 } },
    FieldSpec { name: "fastingBloodSugar", label: "Fasting blood sugar > 120 mg/dl", widget: Widget::Select(YES_NO) },
    FieldSpec {
        name: "restingEcg",
        label: "Resting ECG",
        widget: Widget::Select(&[
            ("0", "Normal"),
            ("1", "ST-T wave abnormality"),
            ("2", "Left ventricular hypertrophy"),
        ]),
    },
    FieldSpec { name: "exerciseAngina", label: "Exercise-induced angina", widget: Widget::Select(YES_NO) },
    FieldSpec { name: "oldpeak", label: "ST depression (oldpeak)", widget: Widget::Number { min: -3.0, max: 7.0, step: 0.1 } },
    FieldSpec {
        name: "stSlope",
        label: "ST slope",
        widget: Widget::Select(&[("1", "Upsloping"), ("2", "Flat"), ("3", "Downsloping")]),
    },
];

/// Fallback for fields without a known widget.
const GENERIC_NUMBER: Widget = Widget::Number { min: 0.0, max: 300.0, step: 1.0 };

/// Widget spec for `name`, or a generic numeric input labelled with the name.
pub fn field_spec(name: &str) -> Option<&'static FieldSpec> {
    FIELD_SPECS.iter().find(|spec| spec.name == name)
}

pub fn widget_for(name: &str) -> Widget {
    field_spec(name).map(|spec| spec.widget).unwrap_or(GENERIC_NUMBER)
}

pub fn label_for(name: &str) -> &str {
    field_spec(name).map(|spec| spec.label).unwrap_or(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::mapping::DEFAULT_FORM_FIELDS;

    #[test]
    fn every_default_field_has_a_widget() {
        for field in DEFAULT_FORM_FIELDS {
            assert!(field_spec(field).is_some(), "{field}");
        }
    }

    #[test]
    fn select_range_spans_option_values() {
        assert_eq!(widget_for("chestPainType").range(), (1.0, 4.0, 1.0));
        assert_eq!(widget_for("glucose").range(), (0.0, 300.0, 1.0));
        assert_eq!(label_for("glucose"), "glucose");
    }
}
