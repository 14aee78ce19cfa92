mod closure;

mod reachable;

mod subset;

mod rename;
