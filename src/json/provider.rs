use super::de::JsonDeserializer;
use super::ser::JsonSerializer;
use super::settings::JsonSettings;
use crate::de::ShapeDeserializer;
use crate::ser::ShapeSerializer;
use std::io;
use std::sync::Arc;

/// A source of JSON serializers and deserializers.
///
/// Providers are registered on [`JsonCodecBuilder`](super::JsonCodecBuilder).
/// The codec uses the one with the highest priority; the built-in provider
/// has priority 0 and wins ties.
pub trait JsonSerdeProvider: Send + Sync {
    /// Higher wins.
    fn priority(&self) -> i32;

    /// Name used in logs.
    fn name(&self) -> &str;

    /// A serializer writing to `sink`.
    fn serializer<'a>(
        &self,
        sink: &'a mut dyn io::Write,
        settings: &'a JsonSettings,
    ) -> Box<dyn ShapeSerializer + 'a>;

    /// A deserializer reading `input`.
    fn deserializer<'a>(
        &self,
        input: &'a [u8],
        settings: &'a JsonSettings,
    ) -> Box<dyn ShapeDeserializer + 'a>;

    /// A deserializer pulling from `reader`.
    fn reader_deserializer<'a>(
        &self,
        reader: &'a mut dyn io::Read,
        settings: &'a JsonSettings,
    ) -> Box<dyn ShapeDeserializer + 'a>;
}

/// The JSON implementation of this crate.
#[derive(Copy, Clone, Debug, Default)]
pub struct DefaultJsonSerdeProvider;

impl JsonSerdeProvider for DefaultJsonSerdeProvider {
    fn priority(&self) -> i32 {
        0
    }

    fn name(&self) -> &str {
        "shape_serde"
    }

    fn serializer<'a>(
        &self,
        sink: &'a mut dyn io::Write,
        settings: &'a JsonSettings,
    ) -> Box<dyn ShapeSerializer + 'a> {
        if settings.pretty_print() {
            Box::new(JsonSerializer::pretty(sink, settings))
        } else {
            Box::new(JsonSerializer::new(sink, settings))
        }
    }

    fn deserializer<'a>(
        &self,
        input: &'a [u8],
        settings: &'a JsonSettings,
    ) -> Box<dyn ShapeDeserializer + 'a> {
        Box::new(JsonDeserializer::from_slice(input, settings))
    }

    fn reader_deserializer<'a>(
        &self,
        reader: &'a mut dyn io::Read,
        settings: &'a JsonSettings,
    ) -> Box<dyn ShapeDeserializer + 'a> {
        Box::new(JsonDeserializer::from_reader(reader, settings))
    }
}

/// Picks the provider with the highest priority. Among equals the one
/// registered first is kept.
pub(crate) fn select(providers: Vec<Arc<dyn JsonSerdeProvider>>) -> Arc<dyn JsonSerdeProvider> {
    let selected = providers
        .into_iter()
        .reduce(|best, candidate| {
            if candidate.priority() > best.priority() {
                candidate
            } else {
                best
            }
        })
        .unwrap_or_else(|| Arc::new(DefaultJsonSerdeProvider));
    log::debug!(
        "using JSON provider `{}` with priority {}",
        selected.name(),
        selected.priority()
    );
    selected
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Named(&'static str, i32);

    impl JsonSerdeProvider for Named {
        fn priority(&self) -> i32 {
            self.1
        }

        fn name(&self) -> &str {
            self.0
        }

        fn serializer<'a>(
            &self,
            sink: &'a mut dyn io::Write,
            settings: &'a JsonSettings,
        ) -> Box<dyn ShapeSerializer + 'a> {
            DefaultJsonSerdeProvider.serializer(sink, settings)
        }

        fn deserializer<'a>(
            &self,
            input: &'a [u8],
            settings: &'a JsonSettings,
        ) -> Box<dyn ShapeDeserializer + 'a> {
            DefaultJsonSerdeProvider.deserializer(input, settings)
        }

        fn reader_deserializer<'a>(
            &self,
            reader: &'a mut dyn io::Read,
            settings: &'a JsonSettings,
        ) -> Box<dyn ShapeDeserializer + 'a> {
            DefaultJsonSerdeProvider.reader_deserializer(reader, settings)
        }
    }

    #[test]
    fn highest_priority_wins() {
        let providers: Vec<Arc<dyn JsonSerdeProvider>> = vec![
            Arc::new(DefaultJsonSerdeProvider),
            Arc::new(Named("low", -5)),
            Arc::new(Named("high", 10)),
            Arc::new(Named("also high", 10)),
        ];
        assert_eq!(select(providers).name(), "high");
    }

    #[test]
    fn builtin_wins_ties() {
        let providers: Vec<Arc<dyn JsonSerdeProvider>> =
            vec![Arc::new(DefaultJsonSerdeProvider), Arc::new(Named("same", 0))];
        assert_eq!(select(providers).name(), "shape_serde");
        assert_eq!(select(Vec::new()).name(), "shape_serde");
    }
}
