use super::{Inner, PersistenceManager, Settings};
use crate::{events::EventDispatcher, Session};

use indexmap::IndexSet;
use stratum_core::{
    Backend, ClassSchema, ClassesConfiguration, DataMapFactory, Error, Reflection, Result, Tca,
};

use std::{cell::RefCell, rc::Rc};

#[derive(Default)]
pub struct Builder {
    reflection: Reflection,
    classes: ClassesConfiguration,
    tca: Tca,
    settings: Settings,
    dispatcher: Option<Rc<dyn EventDispatcher>>,
}

impl Builder {
    /// Registers the schema of a class.
    pub fn register(&mut self, schema: ClassSchema) -> &mut Self {
        self.reflection.register(schema);
        self
    }

    pub fn reflection(&mut self, reflection: Reflection) -> &mut Self {
        self.reflection = reflection;
        self
    }

    pub fn classes(&mut self, classes: ClassesConfiguration) -> &mut Self {
        self.classes = classes;
        self
    }

    pub fn tca(&mut self, tca: Tca) -> &mut Self {
        self.tca = tca;
        self
    }

    pub fn settings(&mut self, settings: Settings) -> &mut Self {
        self.settings = settings;
        self
    }

    pub fn event_dispatcher(&mut self, dispatcher: impl EventDispatcher + 'static) -> &mut Self {
        self.dispatcher = Some(Rc::new(dispatcher));
        self
    }

    /// Builds the persistence manager on top of `backend`.
    ///
    /// Fails when the classes configuration names a subclass that has no
    /// registered schema.
    pub fn build(&mut self, backend: impl Backend + 'static) -> Result<PersistenceManager> {
        for (class_name, config) in self.classes.iter() {
            for subclass in config.subclasses.values() {
                if !self.reflection.has_class(subclass) {
                    return Err(Error::invalid_class(subclass.as_str())
                        .context(stratum_core::err!("subclass of `{class_name}`")));
                }
            }
        }

        let data_map_factory = DataMapFactory::new(
            std::mem::take(&mut self.reflection),
            std::mem::take(&mut self.classes),
            std::mem::take(&mut self.tca),
        );

        Ok(PersistenceManager {
            inner: Rc::new(Inner {
                backend: Box::new(backend),
                data_map_factory,
                settings: std::mem::take(&mut self.settings),
                session: RefCell::new(Session::new()),
                added: RefCell::new(IndexSet::new()),
                removed: RefCell::new(IndexSet::new()),
                changed: RefCell::new(IndexSet::new()),
                dispatcher: self.dispatcher.take(),
            }),
        })
    }
}
