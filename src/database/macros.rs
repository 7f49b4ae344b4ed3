/// Binds a model to its table so that [Record](crate::database::Record) can infer the table name.
///
/// ```ignore
/// define_table!("videos" : Video);
/// ```
#[macro_export]
macro_rules! define_table {
    ($table:literal : $model:ty) => {
        impl $crate::database::Table for $model {
            fn table() -> &'static str {
                $table
            }
        }
    };
}

/// Defines a method to query the database using SQL.
///
/// # Syntax
/// ```ignore
/// [Base Type] > method_name(...arguments) > [Output Type] where "sql query"
/// ```
/// Where the `Base Type` is the type that the method is being defined for and the `Output Type` is the type that the method will return.
/// Every argument is bound to the query parameter of the same name.
///
/// # Example
///
/// ```ignore
/// define_relation! {
///     Comment > for_video(video: &Record<Video>) > Vec<Comment>
///         where "SELECT * FROM comments WHERE video = $video ORDER BY created_at DESC"
/// }
///
/// let comments = Comment::for_video(&video, &db).await?;
/// ```
#[macro_export]
macro_rules! define_relation {
    ($model:ty > $relation:ident ($($binding:ident : $binding_type:ty),*) > $export:ty where $query:literal) => {
        impl $model {
            pub async fn $relation(
                $($binding : $binding_type ,)* db: &$crate::database::Database,
            ) -> ::std::result::Result<$export, $crate::database::DatabaseQueryError> {
                db.sql($query)
                    $(.bind((stringify!($binding), $binding)))*
                    .fetch_first()
                    .await
            }
        }
    };
}
