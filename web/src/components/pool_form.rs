use leptos::prelude::*;
use shared_types::{HealthState, Pool, PoolDraft, ResolutionState};
use thaw::{Button, ButtonAppearance};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    FileNumber,
    LegalName,
    CommercialName,
    PoolType,
    Address,
    District,
    Capacity,
    Area,
    Volume,
    ApprovalResolution,
    ApprovalDate,
    ExpirationDate,
    LastInspectionDate,
    Latitude,
    Longitude,
    Rating,
    ImageUrl,
    Observations,
}

impl Field {
    pub const ALL: [Field; 18] = [
        Field::FileNumber,
        Field::LegalName,
        Field::CommercialName,
        Field::PoolType,
        Field::Address,
        Field::District,
        Field::Capacity,
        Field::Area,
        Field::Volume,
        Field::ApprovalResolution,
        Field::ApprovalDate,
        Field::ExpirationDate,
        Field::LastInspectionDate,
        Field::Latitude,
        Field::Longitude,
        Field::Rating,
        Field::ImageUrl,
        Field::Observations,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Field::FileNumber => "File number",
            Field::LegalName => "Legal name",
            Field::CommercialName => "Commercial name",
            Field::PoolType => "Pool type",
            Field::Address => "Address",
            Field::District => "District",
            Field::Capacity => "Capacity",
            Field::Area => "Area (m²)",
            Field::Volume => "Volume (m³)",
            Field::ApprovalResolution => "Approval resolution",
            Field::ApprovalDate => "Approval date",
            Field::ExpirationDate => "Expiration date",
            Field::LastInspectionDate => "Last inspection",
            Field::Latitude => "Latitude",
            Field::Longitude => "Longitude",
            Field::Rating => "Rating (0-5)",
            Field::ImageUrl => "Image URL",
            Field::Observations => "Observations",
        }
    }

    pub fn input_type(self) -> &'static str {
        match self {
            Field::Capacity
            | Field::Area
            | Field::Volume
            | Field::Latitude
            | Field::Longitude
            | Field::Rating => "number",
            Field::ApprovalDate | Field::ExpirationDate | Field::LastInspectionDate => "date",
            _ => "text",
        }
    }
}

/// Raw text of every form input. Converted to a [`PoolDraft`] on submit.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PoolFormFields {
    values: [String; Field::ALL.len()],
    pub state: ResolutionState,
    pub current_state: HealthState,
    pub is_active: bool,
}

fn optional_text(value: Option<&String>) -> String {
    value.cloned().unwrap_or_default()
}

fn optional_number(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

impl PoolFormFields {
    pub fn new() -> Self {
        Self {
            is_active: true,
            ..Self::default()
        }
    }

    pub fn from_pool(pool: &Pool) -> Self {
        let mut fields = Self {
            state: pool.state,
            current_state: pool.current_state,
            is_active: pool.is_active,
            ..Self::default()
        };
        for field in Field::ALL {
            let value = match field {
                Field::FileNumber => pool.file_number.clone(),
                Field::LegalName => pool.legal_name.clone(),
                Field::CommercialName => optional_text(pool.commercial_name.as_ref()),
                Field::PoolType => pool.pool_type.clone(),
                Field::Address => pool.address.clone(),
                Field::District => pool.district.clone(),
                Field::Capacity => pool.capacity.to_string(),
                Field::Area => pool.area_m2.to_string(),
                Field::Volume => pool.volume_m3.to_string(),
                Field::ApprovalResolution => {
                    optional_text(pool.approval_resolution_number.as_ref())
                }
                Field::ApprovalDate => pool.approval_date.map(|d| d.to_string()).unwrap_or_default(),
                Field::ExpirationDate => {
                    pool.expiration_date.map(|d| d.to_string()).unwrap_or_default()
                }
                Field::LastInspectionDate => pool
                    .last_inspection_date
                    .map(|d| d.to_string())
                    .unwrap_or_default(),
                Field::Latitude => optional_number(pool.latitude),
                Field::Longitude => optional_number(pool.longitude),
                Field::Rating => optional_number(pool.rating),
                Field::ImageUrl => optional_text(pool.image_url.as_ref()),
                Field::Observations => optional_text(pool.observations.as_ref()),
            };
            fields.set(field, value);
        }
        fields
    }

    // `Field::ALL` lists the variants in declaration order.
    pub fn get(&self, field: Field) -> &str {
        &self.values[field as usize]
    }

    pub fn set(&mut self, field: Field, value: String) {
        self.values[field as usize] = value;
    }

    fn text(&self, field: Field) -> String {
        self.get(field).trim().to_string()
    }

    fn optional(&self, field: Field) -> Option<String> {
        Some(self.text(field)).filter(|value| !value.is_empty())
    }

    fn parsed<T: std::str::FromStr>(&self, field: Field) -> Result<Option<T>, String> {
        match self.optional(field) {
            None => Ok(None),
            Some(value) => value
                .parse()
                .map(Some)
                .map_err(|_| format!("{} has an invalid value: {value}", field.label())),
        }
    }

    /// Builds and validates the draft sent to the API.
    pub fn to_draft(&self) -> Result<PoolDraft, String> {
        let draft = PoolDraft {
            file_number: self.text(Field::FileNumber),
            legal_name: self.text(Field::LegalName),
            commercial_name: self.optional(Field::CommercialName),
            pool_type: self.text(Field::PoolType),
            address: self.text(Field::Address),
            district: self.text(Field::District),
            capacity: self.parsed(Field::Capacity)?.unwrap_or_default(),
            area_m2: self.parsed(Field::Area)?.unwrap_or_default(),
            volume_m3: self.parsed(Field::Volume)?.unwrap_or_default(),
            approval_resolution_number: self.optional(Field::ApprovalResolution),
            approval_date: self.parsed(Field::ApprovalDate)?,
            state: self.state,
            observations: self.optional(Field::Observations),
            expiration_date: self.parsed(Field::ExpirationDate)?,
            last_inspection_date: self.parsed(Field::LastInspectionDate)?,
            current_state: self.current_state,
            latitude: self.parsed(Field::Latitude)?,
            longitude: self.parsed(Field::Longitude)?,
            image_url: self.optional(Field::ImageUrl),
            rating: self.parsed(Field::Rating)?,
            is_active: self.is_active,
        };
        draft.validate().map_err(|err| err.to_string())?;
        Ok(draft)
    }
}

#[component]
pub fn PoolForm(
    initial: Option<Pool>,
    on_submit: Callback<PoolDraft>,
    on_cancel: Callback<()>,
    #[prop(into)] submitting: Signal<bool>,
    #[prop(into)] error: Signal<Option<String>>,
) -> impl IntoView {
    let editing = initial.is_some();
    let fields = RwSignal::new(
        initial
            .as_ref()
            .map(PoolFormFields::from_pool)
            .unwrap_or_else(PoolFormFields::new),
    );
    let local_error = RwSignal::new(Option::<String>::None);

    let submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        match fields.with_untracked(PoolFormFields::to_draft) {
            Ok(draft) => {
                local_error.set(None);
                on_submit.run(draft);
            }
            Err(message) => local_error.set(Some(message)),
        }
    };

    let message = move || local_error.get().or_else(|| error.get());

    view! {
        <form class="pool-form" on:submit=submit>
            <h3>{if editing { "Edit pool" } else { "New pool" }}</h3>

            <div class="pool-form__grid">
                {Field::ALL
                    .into_iter()
                    .map(|field| {
                        view! {
                            <label class="pool-form__field">
                                <span>{field.label()}</span>
                                <input
                                    type=field.input_type()
                                    step="any"
                                    prop:value=move || fields.with(|f| f.get(field).to_string())
                                    on:input=move |ev| {
                                        let value = event_target_value(&ev);
                                        fields.update(|f| f.set(field, value));
                                    }
                                />
                            </label>
                        }
                    })
                    .collect_view()}

                <label class="pool-form__field">
                    <span>"Health status"</span>
                    <select on:change=move |ev| {
                        let state = if event_target_value(&ev) == HealthState::Unhealthy.as_str() {
                            HealthState::Unhealthy
                        } else {
                            HealthState::Healthy
                        };
                        fields.update(|f| f.current_state = state);
                    }>
                        {[HealthState::Healthy, HealthState::Unhealthy]
                            .into_iter()
                            .map(|state| view! {
                                <option
                                    value=state.as_str()
                                    selected=move || fields.with(|f| f.current_state == state)
                                >
                                    {state.label()}
                                </option>
                            })
                            .collect_view()}
                    </select>
                </label>

                <label class="pool-form__field">
                    <span>"Resolution"</span>
                    <select on:change=move |ev| {
                        let state = if event_target_value(&ev) == "expired" {
                            ResolutionState::Expired
                        } else {
                            ResolutionState::Valid
                        };
                        fields.update(|f| f.state = state);
                    }>
                        <option
                            value="valid"
                            selected=move || fields.with(|f| f.state == ResolutionState::Valid)
                        >
                            {ResolutionState::Valid.label()}
                        </option>
                        <option
                            value="expired"
                            selected=move || fields.with(|f| f.state == ResolutionState::Expired)
                        >
                            {ResolutionState::Expired.label()}
                        </option>
                    </select>
                </label>

                <label class="pool-form__field pool-form__field--inline">
                    <input
                        type="checkbox"
                        prop:checked=move || fields.with(|f| f.is_active)
                        on:change=move |ev| {
                            let checked = event_target_checked(&ev);
                            fields.update(|f| f.is_active = checked);
                        }
                    />
                    <span>"Active"</span>
                </label>
            </div>

            <Show when=move || message().is_some()>
                <div class="pool-form__error">{move || message().unwrap_or_default()}</div>
            </Show>

            <div class="pool-form__actions">
                <Button
                    appearance=ButtonAppearance::Secondary
                    on_click=move |_| on_cancel.run(())
                >
                    "Cancel"
                </Button>
                <button class="pool-form__submit" type="submit" disabled=move || submitting.get()>
                    {move || if submitting.get() { "Saving..." } else { "Save" }}
                </button>
            </div>
        </form>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_types::PoolId;

    fn filled() -> PoolFormFields {
        let mut fields = PoolFormFields::new();
        fields.set(Field::FileNumber, "EXP-0001".to_string());
        fields.set(Field::LegalName, "Club Internacional SAC".to_string());
        fields.set(Field::PoolType, "Recreational".to_string());
        fields.set(Field::Address, "Av. Ejercito 101".to_string());
        fields.set(Field::District, " Cayma ".to_string());
        fields
    }

    #[test]
    fn blank_optional_fields_become_none() {
        let draft = filled().to_draft().unwrap();
        assert_eq!(draft.district, "Cayma");
        assert_eq!(draft.commercial_name, None);
        assert_eq!(draft.rating, None);
        assert_eq!(draft.capacity, 0);
        assert!(draft.is_active);
    }

    #[test]
    fn numbers_and_dates_are_parsed() {
        let mut fields = filled();
        fields.set(Field::Capacity, "150".to_string());
        fields.set(Field::Rating, "4.5".to_string());
        fields.set(Field::Latitude, "-16.39".to_string());
        fields.set(Field::Longitude, "-71.54".to_string());
        fields.set(Field::ApprovalDate, "2024-03-01".to_string());

        let draft = fields.to_draft().unwrap();
        assert_eq!(draft.capacity, 150);
        assert_eq!(draft.rating, Some(4.5));
        assert_eq!(draft.latitude, Some(-16.39));
        assert_eq!(draft.approval_date.map(|d| d.to_string()).as_deref(), Some("2024-03-01"));
    }

    #[test]
    fn invalid_number_names_the_field() {
        let mut fields = filled();
        fields.set(Field::Capacity, "many".to_string());
        let err = fields.to_draft().unwrap_err();
        assert!(err.starts_with("Capacity"));
    }

    #[test]
    fn missing_required_field_is_rejected() {
        let mut fields = filled();
        fields.set(Field::LegalName, "   ".to_string());
        assert!(fields.to_draft().is_err());
    }

    #[test]
    fn editing_keeps_existing_values() {
        let pool = Pool {
            id: PoolId(3),
            file_number: "EXP-0003".to_string(),
            legal_name: "Owner".to_string(),
            pool_type: "Olympic".to_string(),
            address: "Calle 1".to_string(),
            district: "Yanahuara".to_string(),
            rating: Some(3.5),
            current_state: HealthState::Unhealthy,
            is_active: false,
            ..Pool::default()
        };

        let draft = PoolFormFields::from_pool(&pool).to_draft().unwrap();
        assert_eq!(draft, PoolDraft::from(&pool));
    }
}
