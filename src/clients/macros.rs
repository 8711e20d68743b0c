/// Generates the read methods every store client shares.
///
/// `get_<name>` returns `None` for unknown ids; `list_<name>s` returns every
/// record matching the predicate.
macro_rules! impl_client_methods {
    ($client_name:ident, $entity:ty, $error:ty, $entity_name_snake:ident) => {
        paste::paste! {
            #[allow(dead_code)]
            impl $client_name {
                #[tracing::instrument(skip(self))]
                pub async fn [<get_ $entity_name_snake>](&self, id: uuid::Uuid) -> Result<Option<$entity>, $error> {
                    tracing::debug!("Sending request");
                    self.inner.get(id).await.map_err(<$error>::from)
                }

                #[tracing::instrument(skip(self, filter))]
                pub async fn [<list_ $entity_name_snake s>](
                    &self,
                    filter: impl Fn(&$entity) -> bool + Send + Sync + 'static,
                ) -> Result<Vec<$entity>, $error> {
                    tracing::debug!("Sending request");
                    self.inner.list(filter).await.map_err(<$error>::from)
                }
            }
        }
    };
}

macro_rules! impl_client_new {
    ($client_name:ident, $entity:ty) => {
        impl $client_name {
            pub fn new(inner: crate::actor_framework::ResourceClient<$entity>) -> Self {
                Self { inner }
            }
        }
    };
}

macro_rules! impl_basic_client {
    ($client_name:ident, $entity:ty, $error:ty, $entity_name_snake:ident) => {
        impl_client_new!($client_name, $entity);
        impl_client_methods!($client_name, $entity, $error, $entity_name_snake);
    };
}
