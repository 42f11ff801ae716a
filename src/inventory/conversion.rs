use super::definition::DatabaseDefinition;
use crate::error::DatabaseConversionError;

/// A trait for custom inventory formats that can be converted into a `DatabaseDefinition`.
///
/// This is the extension point for feeding exports of other LCA tools into the
/// reference `Database`. Implement it on the structs you deserialize your format
/// into and load them with `Database::from_definition`.
///
/// # Example
///
/// ```rust,no_run
/// use sankertain::prelude::*;
/// use sankertain::error::DatabaseConversionError;
///
/// struct MyProcess { id: String, label: String }
/// struct MyExport { processes: Vec<MyProcess> }
///
/// impl IntoDatabase for MyExport {
///     fn into_database(self) -> std::result::Result<DatabaseDefinition, DatabaseConversionError> {
///         let activities = self
///             .processes
///             .into_iter()
///             .map(|p| ActivityDefinition {
///                 key: ActivityKey::new(p.id),
///                 name: p.label,
///                 location: "GLO".to_string(),
///                 unit: None,
///                 exchanges: vec![],
///             })
///             .collect();
///         Ok(DatabaseDefinition { activities, methods: vec![] })
///     }
/// }
///
/// let export = MyExport { processes: vec![MyProcess { id: "p1".into(), label: "Pump".into() }] };
/// let database = Database::from_definition(export).unwrap();
/// assert_eq!(database.len(), 1);
/// ```
pub trait IntoDatabase {
    /// Consumes the object and converts it into a database definition.
    fn into_database(self) -> Result<DatabaseDefinition, DatabaseConversionError>;
}

impl IntoDatabase for DatabaseDefinition {
    fn into_database(self) -> Result<DatabaseDefinition, DatabaseConversionError> {
        Ok(self)
    }
}
