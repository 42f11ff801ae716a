use super::{
    Activity, ActivityDefinition, ActivityKey, DatabaseDefinition, Exchange, ExchangeKind,
    IntoDatabase, MethodDefinition,
};
use crate::backend::ActivityStore;
use crate::error::StoreError;
use ahash::AHashMap;
use std::fs;

/// An in-memory activity database.
///
/// Activities keep the order of the definition they were loaded from; that order
/// is also the row/column order of the technosphere matrix built by `MatrixLca`.
#[derive(Debug, Clone)]
pub struct Database {
    activities: Vec<ActivityDefinition>,
    index: AHashMap<ActivityKey, usize>,
    methods: AHashMap<String, MethodDefinition>,
}

impl Database {
    /// Validates a definition and indexes it.
    ///
    /// Every production or technosphere input must name a defined activity;
    /// biosphere inputs are free-form flow keys.
    pub fn new(definition: DatabaseDefinition) -> Result<Self, StoreError> {
        let mut index = AHashMap::with_capacity(definition.activities.len());
        for (position, activity) in definition.activities.iter().enumerate() {
            if index.insert(activity.key.clone(), position).is_some() {
                return Err(StoreError::DuplicateActivity(activity.key.clone()));
            }
        }

        for activity in &definition.activities {
            for exchange in &activity.exchanges {
                if exchange.kind == ExchangeKind::Biosphere {
                    continue;
                }
                if !index.contains_key(&exchange.input) {
                    return Err(StoreError::DanglingExchange {
                        activity: activity.key.clone(),
                        input: exchange.input.clone(),
                    });
                }
            }
        }

        let methods = definition
            .methods
            .into_iter()
            .map(|method| (method.name.clone(), method))
            .collect();

        log::debug!("Indexed database with {} activities", index.len());

        Ok(Self {
            activities: definition.activities,
            index,
            methods,
        })
    }

    /// Parses and validates a database from its JSON representation.
    pub fn from_json(json: &str) -> Result<Self, StoreError> {
        let definition: DatabaseDefinition =
            serde_json::from_str(json).map_err(|e| StoreError::JsonParseError(e.to_string()))?;
        Self::new(definition)
    }

    /// Converts a custom inventory format and validates the result.
    pub fn from_definition(source: impl IntoDatabase) -> Result<Self, StoreError> {
        let definition = source
            .into_database()
            .map_err(|e| StoreError::Conversion(e.to_string()))?;
        Self::new(definition)
    }

    /// Loads a database from a JSON file.
    pub fn from_file(path: &str) -> Result<Self, StoreError> {
        let content = fs::read_to_string(path).map_err(|e| StoreError::Io {
            path: path.to_string(),
            message: e.to_string(),
        })?;
        Self::from_json(&content)
    }

    pub fn len(&self) -> usize {
        self.activities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.activities.is_empty()
    }

    pub fn activities(&self) -> impl Iterator<Item = &ActivityDefinition> {
        self.activities.iter()
    }

    pub fn get(&self, key: &ActivityKey) -> Option<&ActivityDefinition> {
        self.index.get(key).map(|&position| &self.activities[position])
    }

    pub fn methods(&self) -> impl Iterator<Item = &MethodDefinition> {
        self.methods.values()
    }

    fn definition(&self, key: &ActivityKey) -> Result<&ActivityDefinition, StoreError> {
        self.get(key)
            .ok_or_else(|| StoreError::ActivityNotFound(key.clone()))
    }

    fn exchanges_of(
        &self,
        activity: &Activity,
        kind: ExchangeKind,
    ) -> Result<Vec<Exchange>, StoreError> {
        let definition = self.definition(&activity.key)?;
        Ok(definition
            .exchanges
            .iter()
            .filter(|exchange| exchange.kind == kind)
            .map(|exchange| Exchange {
                input: exchange.input.clone(),
                output: exchange
                    .output
                    .clone()
                    .unwrap_or_else(|| definition.key.clone()),
                amount: exchange.amount,
            })
            .collect())
    }
}

impl ActivityStore for Database {
    fn resolve(&self, key: &ActivityKey) -> Result<Activity, StoreError> {
        let definition = self.definition(key)?;
        Ok(Activity {
            key: definition.key.clone(),
            name: definition.name.clone(),
            location: definition.location.clone(),
        })
    }

    fn production(&self, activity: &Activity) -> Result<Vec<Exchange>, StoreError> {
        self.exchanges_of(activity, ExchangeKind::Production)
    }

    fn technosphere(&self, activity: &Activity) -> Result<Vec<Exchange>, StoreError> {
        self.exchanges_of(activity, ExchangeKind::Technosphere)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TINY: &str = r#"{
        "activities": [
            {"key": "a", "name": "A", "location": "DE", "exchanges": [
                {"input": "a", "amount": 2.0, "kind": "production"},
                {"input": "b", "amount": 0.5, "kind": "technosphere"},
                {"input": "co2", "amount": 1.0, "kind": "biosphere"}
            ]},
            {"key": "b", "name": "B", "location": "FR"}
        ]
    }"#;

    #[test]
    fn splits_exchanges_by_kind() {
        let db = Database::from_json(TINY).unwrap();
        let a = db.resolve(&ActivityKey::from("a")).unwrap();
        assert_eq!(a.display_name(), "A, DE");

        let production = db.production(&a).unwrap();
        assert_eq!(production.len(), 1);
        assert!(production[0].is_self_loop());

        let inputs = db.technosphere(&a).unwrap();
        assert_eq!(inputs.len(), 1);
        assert_eq!(inputs[0].input.as_str(), "b");
        assert_eq!(inputs[0].output.as_str(), "a");
    }

    #[test]
    fn rejects_dangling_inputs() {
        let json = r#"{"activities": [{"key": "a", "name": "A", "exchanges": [
            {"input": "ghost", "amount": 1.0, "kind": "technosphere"}
        ]}]}"#;
        let err = Database::from_json(json).unwrap_err();
        assert!(matches!(err, StoreError::DanglingExchange { .. }));
    }

    #[test]
    fn rejects_duplicate_keys() {
        let json = r#"{"activities": [
            {"key": "a", "name": "A"},
            {"key": "a", "name": "A again"}
        ]}"#;
        let err = Database::from_json(json).unwrap_err();
        assert_eq!(err, StoreError::DuplicateActivity(ActivityKey::from("a")));
    }
}
