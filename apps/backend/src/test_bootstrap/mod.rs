//! Test-only bootstrap helpers compiled into unit test builds.
